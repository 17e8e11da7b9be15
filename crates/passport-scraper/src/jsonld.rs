//! schema.org `Product` extraction from `<script type="application/ld+json">`
//! blocks.
//!
//! Storefronts publish the same facts in many shapes: `offers` as an object or
//! an array, prices as strings or numbers, `image` as a URL, a list, or an
//! `ImageObject`. Every accessor here tolerates all of them and returns `None`
//! on anything else.

use std::sync::LazyLock;

use passport_core::text::{clean_text, format_price, ParsedPrice};
use passport_core::ExtractedReview;
use scraper::{Html, Selector};
use serde_json::Value;

static LD_JSON_SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[type='application/ld+json']").expect("valid json-ld selector")
});

const PRODUCT_TYPES: &[&str] = &["Product", "ProductGroup", "IndividualProduct"];

/// Every `Product` node in the document's JSON-LD blocks, in document order.
///
/// Top-level objects, top-level arrays, `@graph` containers and a page's
/// `mainEntity` are all searched. Blocks that fail to parse are skipped.
#[must_use]
pub fn collect_products(doc: &Html) -> Vec<Value> {
    let mut products = Vec::new();

    for script in doc.select(&LD_JSON_SCRIPT) {
        let text: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<Value>(text.trim()) else {
            continue;
        };

        let mut candidates: Vec<Value> = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        let mut expanded = Vec::new();
        for item in &candidates {
            if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
                expanded.extend(graph.iter().cloned());
            }
            if let Some(main) = item.get("mainEntity") {
                expanded.push(main.clone());
            }
        }
        candidates.extend(expanded);

        products.extend(candidates.into_iter().filter(is_product));
    }

    products
}

fn is_product(item: &Value) -> bool {
    match item.get("@type") {
        Some(Value::String(kind)) => PRODUCT_TYPES.iter().any(|t| kind.eq_ignore_ascii_case(t)),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| PRODUCT_TYPES.iter().any(|t| kind.eq_ignore_ascii_case(t))),
        _ => false,
    }
}

/// A string, or a number rendered as a string.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let cleaned = clean_text(s);
            (!cleaned.is_empty()).then_some(cleaned)
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Maps an ISO 4217 code to its display symbol. Unknown codes keep the dollar
/// sign so the canonical price shape stays uniform.
#[must_use]
pub fn currency_symbol(code: &str) -> &'static str {
    match code.trim().to_ascii_uppercase().as_str() {
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        _ => "$",
    }
}

#[must_use]
pub fn product_name(product: &Value) -> Option<String> {
    product.get("name").and_then(scalar_text)
}

#[must_use]
pub fn product_description(product: &Value) -> Option<String> {
    product.get("description").and_then(scalar_text)
}

/// First offer price, `lowPrice` for aggregate offers.
#[must_use]
pub fn product_price(product: &Value) -> Option<ParsedPrice> {
    let offers = product.get("offers")?;
    let offer_list: Vec<&Value> = match offers {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    offer_list.into_iter().find_map(|offer| {
        let value = offer
            .get("price")
            .or_else(|| offer.get("lowPrice"))
            .and_then(scalar_f64)
            .filter(|v| *v > 0.0)?;
        let symbol = offer
            .get("priceCurrency")
            .and_then(Value::as_str)
            .map_or("$", currency_symbol);
        Some(ParsedPrice {
            text: format_price(value, symbol),
            value,
        })
    })
}

/// `aggregateRating.ratingValue` when it lies in `0..=5`.
#[must_use]
pub fn product_rating(product: &Value) -> Option<f64> {
    product
        .get("aggregateRating")
        .and_then(|agg| agg.get("ratingValue"))
        .and_then(scalar_f64)
        .filter(|v| (0.0..=5.0).contains(v))
}

/// `aggregateRating.reviewCount`, falling back to `ratingCount`.
#[must_use]
pub fn product_review_count(product: &Value) -> Option<String> {
    let agg = product.get("aggregateRating")?;
    agg.get("reviewCount")
        .or_else(|| agg.get("ratingCount"))
        .and_then(scalar_text)
}

#[must_use]
pub fn product_image(product: &Value) -> Option<String> {
    fn image_url(value: &Value) -> Option<String> {
        match value {
            Value::String(url) => (!url.trim().is_empty()).then(|| url.trim().to_owned()),
            Value::Array(items) => items.iter().find_map(image_url),
            Value::Object(obj) => obj
                .get("url")
                .or_else(|| obj.get("contentUrl"))
                .and_then(image_url),
            _ => None,
        }
    }
    product.get("image").and_then(image_url)
}

/// Reviews embedded in the product node. Ratings outside `1..=5` are dropped
/// to `None`.
#[must_use]
pub fn product_reviews(product: &Value) -> Vec<ExtractedReview> {
    let Some(reviews) = product.get("review") else {
        return Vec::new();
    };
    let list: Vec<&Value> = match reviews {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    list.into_iter()
        .filter_map(|review| {
            let text = review
                .get("reviewBody")
                .or_else(|| review.get("description"))
                .and_then(scalar_text)?;
            let rating = review
                .get("reviewRating")
                .and_then(|r| r.get("ratingValue"))
                .and_then(scalar_f64)
                .and_then(star_rating);
            Some(ExtractedReview {
                text,
                rating,
                verified: false,
            })
        })
        .collect()
}

/// Rounds a parsed star value to a whole `1..=5` rating.
#[must_use]
pub fn star_rating(value: f64) -> Option<u8> {
    let rounded = value.round();
    if !(1.0..=5.0).contains(&rounded) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let stars = rounded as u8;
    Some(stars)
}

/// A product fact the selector ladder can read from JSON-LD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLdField {
    Name,
    Description,
    Price,
    Rating,
    ReviewCount,
    Image,
}

impl JsonLdField {
    /// Raw text of this field on `product`, before ladder validation.
    #[must_use]
    pub fn read(self, product: &Value) -> Option<String> {
        match self {
            JsonLdField::Name => product_name(product),
            JsonLdField::Description => product_description(product),
            JsonLdField::Price => product_price(product).map(|p| p.text),
            JsonLdField::Rating => product_rating(product).map(|r| format!("{r} out of 5")),
            JsonLdField::ReviewCount => product_review_count(product),
            JsonLdField::Image => product_image(product),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(blocks: &[&str]) -> String {
        let scripts: String = blocks
            .iter()
            .map(|b| format!("<script type=\"application/ld+json\">{b}</script>"))
            .collect();
        format!("<html><head>{scripts}</head><body></body></html>")
    }

    #[test]
    fn collects_top_level_product() {
        let html = page(&[r#"{"@type":"Product","name":"Tee"}"#]);
        let products = collect_products(&Html::parse_document(&html));
        assert_eq!(products.len(), 1);
        assert_eq!(product_name(&products[0]).as_deref(), Some("Tee"));
    }

    #[test]
    fn collects_from_graph_and_array_and_skips_invalid() {
        let html = page(&[
            r#"{"@context":"https://schema.org","@graph":[{"@type":"BreadcrumbList"},{"@type":["Product","Thing"],"name":"A"}]}"#,
            r#"[{"@type":"Organization"},{"@type":"Product","name":"B"}]"#,
            "{ not json",
        ]);
        let names: Vec<String> = collect_products(&Html::parse_document(&html))
            .iter()
            .filter_map(product_name)
            .collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn reads_offer_price_in_any_shape() {
        let product: Value = serde_json::json!({
            "@type": "Product",
            "offers": [{"price": "39.5", "priceCurrency": "EUR"}]
        });
        let price = product_price(&product).expect("price");
        assert_eq!(price.text, "€39.50");

        let aggregate: Value = serde_json::json!({
            "@type": "Product",
            "offers": {"@type": "AggregateOffer", "lowPrice": 12}
        });
        assert_eq!(product_price(&aggregate).expect("price").text, "$12.00");
    }

    #[test]
    fn reads_rating_count_and_image() {
        let product: Value = serde_json::json!({
            "@type": "Product",
            "image": [{"@type": "ImageObject", "url": "https://cdn.example.com/a.jpg"}],
            "aggregateRating": {"ratingValue": "4.6", "ratingCount": 812}
        });
        assert_eq!(product_rating(&product), Some(4.6));
        assert_eq!(product_review_count(&product).as_deref(), Some("812"));
        assert_eq!(
            product_image(&product).as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn reads_embedded_reviews() {
        let product: Value = serde_json::json!({
            "@type": "Product",
            "review": [
                {"reviewBody": "Soft and warm", "reviewRating": {"ratingValue": 5}},
                {"reviewBody": "No stars here"},
                {"reviewRating": {"ratingValue": 1}}
            ]
        });
        let reviews = product_reviews(&product);
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, Some(5));
        assert_eq!(reviews[1].rating, None);
    }

    #[test]
    fn field_reader_formats_rating_for_validation() {
        let product: Value = serde_json::json!({"aggregateRating": {"ratingValue": 4.5}});
        assert_eq!(
            JsonLdField::Rating.read(&product).as_deref(),
            Some("4.5 out of 5")
        );
    }
}
