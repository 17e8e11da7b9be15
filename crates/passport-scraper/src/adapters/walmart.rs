//! Walmart product and search selectors.

use passport_core::Retailer;

use super::product::{ProductProfile, ReviewProfile};
use super::search::SearchProfile;
use crate::jsonld::JsonLdField;
use crate::ladder::Locator;
use crate::signals::SignalProfile;

pub static PRODUCT: ProductProfile = ProductProfile {
    retailer: Retailer::Walmart,
    name: &[
        Locator::Meta("og:title"),
        Locator::JsonLd(JsonLdField::Name),
        Locator::Text("h1[itemprop='name']"),
        Locator::Text("#main-title"),
        Locator::Text("h1"),
        Locator::Text("title"),
    ],
    price: &[
        Locator::Attr("[itemprop='price']", "content"),
        Locator::Text("[itemprop='price']"),
        Locator::JsonLd(JsonLdField::Price),
        Locator::Text("[data-testid='price-wrap'] span"),
        Locator::Pattern(r"(?:Now|Current price)\s*\$\s?\d[\d,]*(?:\.\d{2})?"),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::JsonLd(JsonLdField::Rating),
        Locator::Attr("[itemprop='ratingValue']", "content"),
        Locator::Text("[data-testid='reviews-and-ratings'] .rating-number"),
        Locator::Attr("[data-testid='reviews-and-ratings'] [aria-label]", "aria-label"),
        Locator::Pattern(r"\((\d(?:\.\d)?)\)\s*\d[\d,]*\s*reviews"),
        Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
    ],
    review_count: &[
        Locator::JsonLd(JsonLdField::ReviewCount),
        Locator::Attr("[itemprop='reviewCount']", "content"),
        Locator::Text("[itemprop='reviewCount']"),
        Locator::Text("[data-testid='item-review-section-link']"),
        Locator::Pattern(r"([\d,.]+[KkMm]?)\s+(?:reviews|ratings)"),
    ],
    description: &[
        Locator::Meta("og:description"),
        Locator::Meta("description"),
        Locator::JsonLd(JsonLdField::Description),
        Locator::Text("[data-testid='product-description-content']"),
        Locator::Text("#product-description-section"),
    ],
    image: &[
        Locator::Meta("og:image"),
        Locator::JsonLd(JsonLdField::Image),
        Locator::Attr("[data-testid='hero-image-container'] img", "src"),
        Locator::Attr("img[data-testid='media-thumbnail']", "src"),
    ],
    reviews: ReviewProfile {
        blocks: &[
            "[data-testid='enhanced-review-content']",
            "[itemprop='review']",
            "li.review",
        ],
        text: &[
            Locator::Text("[itemprop='reviewBody']"),
            Locator::Text("span.tl-m"),
            Locator::Text("p"),
        ],
        rating: &[
            Locator::Attr("[itemprop='ratingValue']", "content"),
            Locator::Text(".w_iUH7"),
            Locator::Attr("[aria-label*='out of 5']", "aria-label"),
            Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
        ],
        verified: &["[data-testid='verified-purchase']", ".pl2.green"],
        anchor: Some("[data-testid='item-review-section']"),
        feedback_style: false,
    },
    signals: SignalProfile {
        spec_rows: &[
            "[data-testid='product-specifications'] tr",
            "[data-testid='specifications'] div.pb2",
            ".specifications-table tr",
            "[data-testid='product-description-content'] li",
        ],
        badges: &[
            "[data-testid='sustainability-badge']",
            "[aria-label*='Built for Better']",
            ".sustainability-attribute",
        ],
        bullets: &[
            "[data-testid='product-description-content'] li",
            ".about-desc li",
        ],
    },
};

pub static SEARCH: SearchProfile = SearchProfile {
    retailer: Retailer::Walmart,
    cards: &[
        "[data-item-id]",
        "[data-testid='list-view'] > div",
        "div.search-result-gridview-item",
    ],
    links: &["a[link-identifier]", "a[href*='/ip/']"],
    name: &[
        Locator::Text("[data-automation-id='product-title']"),
        Locator::Text("span.w_iUH7"),
        Locator::Attr("img", "alt"),
    ],
    price: &[
        Locator::Text("[data-automation-id='product-price'] .w_iUH7"),
        Locator::Text("[data-automation-id='product-price'] div"),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::Text("[data-testid='product-ratings'] .w_iUH7"),
        Locator::Attr("[data-testid='product-ratings']", "data-value"),
        Locator::Pattern(r"(\d(?:\.\d)?) out of 5 Stars"),
    ],
    review_count: &[
        Locator::Attr("[data-testid='product-reviews']", "data-value"),
        Locator::Pattern(r"([\d,.]+[KkMm]?)\s+reviews"),
    ],
    image: &[
        Locator::Attr("img[data-testid='productTileImage']", "src"),
        Locator::Attr("img", "src"),
    ],
    climate_badges: &[
        "[aria-label*='Built for Better']",
        "[data-testid='sustainability-badge']",
    ],
};
