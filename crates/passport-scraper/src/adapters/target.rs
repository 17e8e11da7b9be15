//! Target product and search selectors.
//!
//! Target has no standalone reviews URL; reviews come from the inline
//! section or the page's JSON-LD.

use passport_core::Retailer;

use super::product::{ProductProfile, ReviewProfile};
use super::search::SearchProfile;
use crate::jsonld::JsonLdField;
use crate::ladder::Locator;
use crate::signals::SignalProfile;

pub static PRODUCT: ProductProfile = ProductProfile {
    retailer: Retailer::Target,
    name: &[
        Locator::Meta("og:title"),
        Locator::JsonLd(JsonLdField::Name),
        Locator::Text("[data-test='product-title']"),
        Locator::Text("h1"),
        Locator::Text("title"),
    ],
    price: &[
        Locator::Attr("[data-test='product-price']", "content"),
        Locator::Text("[data-test='product-price']"),
        Locator::JsonLd(JsonLdField::Price),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::JsonLd(JsonLdField::Rating),
        Locator::Attr("[data-test='ratings']", "aria-label"),
        Locator::Text("[data-test='ratings'] span"),
        Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
    ],
    review_count: &[
        Locator::JsonLd(JsonLdField::ReviewCount),
        Locator::Text("[data-test='rating-count']"),
        Locator::Pattern(r"([\d,.]+[KkMm]?)\s+(?:reviews|ratings)"),
    ],
    description: &[
        Locator::Text("[data-test='item-details-description']"),
        Locator::Meta("description"),
        Locator::JsonLd(JsonLdField::Description),
    ],
    image: &[
        Locator::Meta("og:image"),
        Locator::JsonLd(JsonLdField::Image),
        Locator::Attr("[data-test='product-image'] img", "src"),
    ],
    reviews: ReviewProfile {
        blocks: &["[data-test='review-card']", "[data-test='reviews-list'] > div"],
        text: &[
            Locator::Text("[data-test='review-card--text']"),
            Locator::Text("p"),
        ],
        rating: &[
            Locator::Text("[data-test='ratings'] span"),
            Locator::Attr("[data-test='ratings']", "aria-label"),
            Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
        ],
        verified: &["[data-test='review-card--verified']"],
        anchor: Some("[data-test='reviews-section']"),
        feedback_style: false,
    },
    signals: SignalProfile {
        spec_rows: &[
            "[data-test='item-details-specifications'] > div",
            "[data-test='item-details-specifications'] div",
        ],
        badges: &[
            "[data-test='sustainability-badge']",
            "[data-test='target-clean-badge']",
        ],
        bullets: &["[data-test='item-details-highlights'] li"],
    },
};

pub static SEARCH: SearchProfile = SearchProfile {
    retailer: Retailer::Target,
    cards: &[
        "[data-test='@web/site-top-of-funnel/ProductCardWrapper']",
        "[data-test='product-card']",
        "section[class*='ProductCard']",
    ],
    links: &["a[data-test='product-title']", "a[href*='/A-']"],
    name: &[
        Locator::Text("[data-test='product-title']"),
        Locator::Attr("img", "alt"),
    ],
    price: &[
        Locator::Text("[data-test='current-price']"),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::Attr("[data-test='ratings']", "aria-label"),
        Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
    ],
    review_count: &[
        Locator::Text("[data-test='rating-count']"),
        Locator::Pattern(r"with ([\d,.]+[KkMm]?)\s+(?:reviews|ratings)"),
    ],
    image: &[Locator::Attr("picture img", "src"), Locator::Attr("img", "src")],
    climate_badges: &["[data-test='sustainability-badge']"],
};
