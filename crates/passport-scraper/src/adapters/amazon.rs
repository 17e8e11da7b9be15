//! Amazon product and search selectors.

use passport_core::Retailer;

use super::product::{ProductProfile, ReviewProfile};
use super::search::SearchProfile;
use crate::jsonld::JsonLdField;
use crate::ladder::Locator;
use crate::signals::SignalProfile;

pub static PRODUCT: ProductProfile = ProductProfile {
    retailer: Retailer::Amazon,
    name: &[
        Locator::Meta("og:title"),
        Locator::JsonLd(JsonLdField::Name),
        Locator::Text("#productTitle"),
        Locator::Text("h1"),
        Locator::Text("title"),
    ],
    price: &[
        Locator::Text("#corePrice_feature_div .a-price .a-offscreen"),
        Locator::Text("#corePriceDisplay_desktop_feature_div .a-price .a-offscreen"),
        Locator::Text(".a-price .a-offscreen"),
        Locator::Attr("[data-asin-price]", "data-asin-price"),
        Locator::JsonLd(JsonLdField::Price),
        Locator::Text("#priceblock_ourprice"),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::JsonLd(JsonLdField::Rating),
        Locator::Attr("#acrPopover", "title"),
        Locator::Text("#acrPopover .a-icon-alt"),
        Locator::Text("[data-hook='rating-out-of-text']"),
        Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
    ],
    review_count: &[
        Locator::JsonLd(JsonLdField::ReviewCount),
        Locator::Text("#acrCustomerReviewText"),
        Locator::Text("[data-hook='total-review-count']"),
        Locator::Pattern(r"([\d,.]+[KkMm]?)\s+(?:global\s+)?ratings"),
    ],
    description: &[
        Locator::Text("#productDescription"),
        Locator::Text("#feature-bullets"),
        Locator::Meta("description"),
        Locator::JsonLd(JsonLdField::Description),
    ],
    image: &[
        Locator::Attr("#landingImage", "data-old-hires"),
        Locator::Attr("#landingImage", "src"),
        Locator::Attr("#imgTagWrapperId img", "src"),
        Locator::Meta("og:image"),
        Locator::JsonLd(JsonLdField::Image),
    ],
    reviews: ReviewProfile {
        blocks: &["[data-hook='review']", "#cm-cr-dp-review-list .review"],
        text: &[
            Locator::Text("[data-hook='review-body']"),
            Locator::Text(".review-text-content"),
            Locator::Text(".review-text"),
        ],
        rating: &[
            Locator::Text("[data-hook='review-star-rating'] .a-icon-alt"),
            Locator::Text("[data-hook='cmps-review-star-rating'] .a-icon-alt"),
            Locator::Attr("i[class*='a-star']", "aria-label"),
            Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
        ],
        verified: &["[data-hook='avp-badge']", "[data-hook='avp-badge-linkless']"],
        anchor: Some("#reviewsMedley"),
        feedback_style: false,
    },
    signals: SignalProfile {
        spec_rows: &[
            "#productDetails_techSpec_section_1 tr",
            "#productDetails_detailBullets_sections1 tr",
            "#detailBullets_feature_div li",
            "#productOverview_feature_div tr",
            ".product-facts-detail",
        ],
        badges: &[
            "#climatePledgeFriendly",
            "[data-csa-c-content-id*='climate-pledge']",
            ".cpf-badge",
        ],
        bullets: &["#feature-bullets li", "#productFactsDesktopExpander li"],
    },
};

pub static SEARCH: SearchProfile = SearchProfile {
    retailer: Retailer::Amazon,
    cards: &[
        "[data-component-type='s-search-result']",
        "div.s-result-item[data-asin]",
    ],
    links: &["h2 a", "a.a-link-normal[href*='/dp/']", "a[href]"],
    name: &[
        Locator::Text("h2 span"),
        Locator::Attr("h2", "aria-label"),
        Locator::Text("h2"),
        Locator::Attr("img.s-image", "alt"),
    ],
    price: &[
        Locator::Text(".a-price .a-offscreen"),
        Locator::Pattern(r"\$\s?\d[\d,]*(?:\.\d{2})?"),
    ],
    rating: &[
        Locator::Text(".a-icon-star-small .a-icon-alt"),
        Locator::Text(".a-icon-alt"),
        Locator::Attr("[aria-label*='out of 5']", "aria-label"),
    ],
    review_count: &[
        Locator::Attr("[aria-label$='ratings']", "aria-label"),
        Locator::Text("a[href*='customerReviews'] span"),
        Locator::Text(".s-underline-text"),
    ],
    image: &[Locator::Attr("img.s-image", "src")],
    climate_badges: &[
        "[data-csa-c-content-id*='climate-pledge']",
        "[aria-label*='Climate Pledge']",
        ".s-climate-pledge-badge",
    ],
};
