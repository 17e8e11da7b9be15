//! eBay product and search selectors.
//!
//! eBay listings carry seller feedback rather than star-rated product
//! reviews, so feedback entries are kept without a rating.

use passport_core::Retailer;

use super::product::{ProductProfile, ReviewProfile};
use super::search::SearchProfile;
use crate::jsonld::JsonLdField;
use crate::ladder::Locator;
use crate::signals::SignalProfile;

pub static PRODUCT: ProductProfile = ProductProfile {
    retailer: Retailer::Ebay,
    name: &[
        Locator::Meta("og:title"),
        Locator::JsonLd(JsonLdField::Name),
        Locator::Text(".x-item-title__mainTitle"),
        Locator::Text("h1"),
        Locator::Text("title"),
    ],
    price: &[
        Locator::Attr("[itemprop='price']", "content"),
        Locator::Text(".x-price-primary"),
        Locator::JsonLd(JsonLdField::Price),
        Locator::Pattern(r"US\s?\$\s?\d[\d,]*(?:\.\d{2})?"),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::JsonLd(JsonLdField::Rating),
        Locator::Text(".ux-summary__start--rating"),
        Locator::Text(".review--start--rating"),
        Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
    ],
    review_count: &[
        Locator::JsonLd(JsonLdField::ReviewCount),
        Locator::Text(".ux-summary__count"),
        Locator::Pattern(r"([\d,.]+[KkMm]?)\s+product ratings"),
    ],
    description: &[
        Locator::Meta("og:description"),
        Locator::Meta("description"),
        Locator::JsonLd(JsonLdField::Description),
        Locator::Text(".x-item-description"),
    ],
    image: &[
        Locator::Meta("og:image"),
        Locator::JsonLd(JsonLdField::Image),
        Locator::Attr(".ux-image-carousel-item img", "src"),
        Locator::Attr(".ux-image-carousel-item img", "data-src"),
    ],
    reviews: ReviewProfile {
        blocks: &[
            ".fdbk-container",
            "[data-testid='fdbk-item']",
            ".ebay-review-section",
        ],
        text: &[
            Locator::Text(".fdbk-container__details__comment"),
            Locator::Text("[data-testid='fdbk-comment']"),
            Locator::Text(".review-item-content"),
        ],
        rating: &[
            Locator::Attr(".star-rating", "aria-label"),
            Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
        ],
        verified: &[".fdbk-container__details__verified__purchase"],
        anchor: Some("#feedback"),
        feedback_style: true,
    },
    signals: SignalProfile {
        spec_rows: &[
            ".ux-layout-section-evo__col",
            ".ux-labels-values",
            ".itemAttr tr",
        ],
        badges: &[".ux-section-icon-with-details__data-title"],
        bullets: &[".x-item-description li"],
    },
};

pub static SEARCH: SearchProfile = SearchProfile {
    retailer: Retailer::Ebay,
    cards: &["li.s-item", "li.s-card", "ul.srp-results > li"],
    links: &["a.s-item__link", "a.su-link", "a[href*='/itm/']"],
    name: &[
        Locator::Text(".s-item__title"),
        Locator::Text(".s-card__title"),
        Locator::Attr("img", "alt"),
    ],
    price: &[
        Locator::Text(".s-item__price"),
        Locator::Text(".s-card__price"),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::Text(".x-star-rating .clipped"),
        Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
    ],
    review_count: &[
        Locator::Text(".s-item__reviews-count span"),
        Locator::Pattern(r"([\d,.]+[KkMm]?)\s+product ratings"),
    ],
    image: &[
        Locator::Attr(".s-item__image-wrapper img", "src"),
        Locator::Attr("img", "data-src"),
        Locator::Attr("img", "src"),
    ],
    // eBay result cards carry no climate programme marker.
    climate_badges: &[],
};
