//! Selector ladder: ordered field-extraction strategies, first valid wins.
//!
//! Retailers differ only in the data they feed this module (which selectors,
//! which attributes, which body-text patterns). Control flow is shared:
//!
//! 1. each [`Locator`] produces zero or more raw candidates from the scope,
//! 2. each candidate is run through the field's [`Validate`] function,
//! 3. the first accepted value is returned and later locators never run.
//!
//! A locator that errors (bad selector, no document) aborts the ladder with
//! that error. Callers wrap each field in its own failure boundary so the
//! error only costs that one field.

use passport_core::text::clean_text;
use regex::Regex;

use crate::error::PageError;
use crate::jsonld::JsonLdField;
use crate::page::Scope;

/// Accepts and normalizes a raw candidate, or rejects it with `None`.
pub type Validate = fn(&str) -> Option<String>;

/// Where a candidate value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Visible text of each element matching the selector.
    Text(&'static str),
    /// Named attribute of each element matching the selector.
    Attr(&'static str, &'static str),
    /// `<meta>` content by `property` or `name`.
    Meta(&'static str),
    /// A field of the first JSON-LD product node that has it.
    JsonLd(JsonLdField),
    /// Regex over the scope's visible text. Capture group 1 when present,
    /// otherwise the whole match.
    Pattern(&'static str),
}

impl Locator {
    /// Raw candidates in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Selector`] for an unparseable selector or
    /// pattern, and whatever the scope returns for document access.
    pub fn candidates<S: Scope + ?Sized>(self, scope: &S) -> Result<Vec<String>, PageError> {
        match self {
            Locator::Text(selector) => Ok(scope
                .select_all(selector)?
                .iter()
                .map(|el| el.text().to_owned())
                .collect()),
            Locator::Attr(selector, name) => Ok(scope
                .select_all(selector)?
                .iter()
                .filter_map(|el| el.attr(name).map(clean_text))
                .collect()),
            Locator::Meta(key) => Ok(scope.meta_content(key)?.into_iter().collect()),
            Locator::JsonLd(field) => Ok(scope
                .json_ld_products()?
                .iter()
                .filter_map(|product| field.read(product))
                .collect()),
            Locator::Pattern(pattern) => {
                let re = Regex::new(pattern).map_err(|e| PageError::Selector {
                    selector: pattern.to_owned(),
                    reason: e.to_string(),
                })?;
                let text = scope.scope_text()?;
                Ok(re
                    .captures_iter(&text)
                    .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
                    .map(|m| m.as_str().to_owned())
                    .collect())
            }
        }
    }
}

/// Tries `attempt` on each strategy in order and returns the first `Some`.
/// An `Err` stops the walk.
///
/// # Errors
///
/// Propagates the first error returned by `attempt`.
pub fn first_valid<I, T, E, F>(strategies: I, mut attempt: F) -> Result<Option<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Result<Option<T>, E>,
{
    for strategy in strategies {
        if let Some(found) = attempt(strategy)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Runs `locators` in order against `scope`, returning the first candidate
/// `validate` accepts.
///
/// # Errors
///
/// Propagates the first locator error; see [`Locator::candidates`].
pub fn run_ladder<S: Scope + ?Sized>(
    scope: &S,
    field: &'static str,
    locators: &[Locator],
    validate: Validate,
) -> Result<Option<String>, PageError> {
    first_valid(locators.iter().copied(), |locator| {
        let hit = locator
            .candidates(scope)?
            .iter()
            .find_map(|candidate| validate(candidate));
        if hit.is_some() {
            tracing::debug!(field, ?locator, "ladder hit");
        }
        Ok(hit)
    })
}

/// Field failure boundary: an error becomes the field's empty value plus a
/// warning, so one broken strategy never costs the rest of the extraction.
pub fn absent_on_error<T: Default>(
    field: &'static str,
    url: &str,
    result: Result<T, PageError>,
) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(field, url, error = %e, "field extraction failed; leaving it absent");
        T::default()
    })
}

// ---------------------------------------------------------------------------
// Validators shared by the adapters
// ---------------------------------------------------------------------------

/// Non-empty text up to 300 characters.
#[must_use]
pub fn plausible_name(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    let len = cleaned.chars().count();
    (2..=300).contains(&len).then_some(cleaned)
}

/// Text long enough to describe something, capped at 2000 characters.
#[must_use]
pub fn plausible_description(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    if cleaned.chars().count() < 20 {
        return None;
    }
    Some(cleaned.chars().take(2000).collect())
}

/// Short label text (origin, badge): 2 to 120 characters.
#[must_use]
pub fn plausible_label(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    let len = cleaned.chars().count();
    (2..=120).contains(&len).then_some(cleaned)
}

/// An image reference that is not inline data or a placeholder sprite.
/// Protocol-relative URLs are upgraded to `https:`; root-relative paths pass
/// through for the caller to resolve.
#[must_use]
pub fn image_reference(raw: &str) -> Option<String> {
    let src = raw.trim();
    let lower = src.to_ascii_lowercase();
    if src.is_empty()
        || lower.starts_with("data:")
        || lower.contains("sprite")
        || lower.contains("transparent-pixel")
        || lower.contains("grey-pixel")
    {
        return None;
    }
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    (lower.starts_with("http://") || lower.starts_with("https://") || src.starts_with('/'))
        .then(|| src.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use passport_core::text::{validate_price, validate_rating};

    const PAGE: &str = r#"
        <html><head>
          <meta property="og:title" content="Organic Cotton Tee">
          <script type="application/ld+json">
            {"@type":"Product","name":"LD Tee","offers":{"price":"21.00"},
             "aggregateRating":{"ratingValue":4.4}}
          </script>
        </head><body>
          <h1>  Heading Tee </h1>
          <span class="price">See price in cart</span>
          <span class="price" data-price="19.99">$19.99</span>
          <p>Customers rate this 4.1 out of 5 stars overall.</p>
        </body></html>"#;

    fn page() -> StaticPage {
        StaticPage::new("https://shop.example.com/p/1", PAGE)
    }

    #[test]
    fn first_valid_candidate_wins_within_a_locator() {
        let price = run_ladder(&page(), "price", &[Locator::Text(".price")], validate_price)
            .unwrap();
        assert_eq!(price.as_deref(), Some("$19.99"));
    }

    #[test]
    fn earlier_locator_shadows_later_ones() {
        let name = run_ladder(
            &page(),
            "name",
            &[Locator::Meta("og:title"), Locator::Text("h1")],
            plausible_name,
        )
        .unwrap();
        assert_eq!(name.as_deref(), Some("Organic Cotton Tee"));
    }

    #[test]
    fn falls_through_to_json_ld_then_pattern() {
        let price = run_ladder(
            &page(),
            "price",
            &[
                Locator::Attr("[itemprop='price']", "content"),
                Locator::JsonLd(JsonLdField::Price),
            ],
            validate_price,
        )
        .unwrap();
        assert_eq!(price.as_deref(), Some("$21.00"));

        let rating = run_ladder(
            &page(),
            "rating",
            &[
                Locator::Text(".stars"),
                Locator::Pattern(r"(\d(?:\.\d)?) out of 5 stars"),
            ],
            validate_rating,
        )
        .unwrap();
        assert_eq!(rating.as_deref(), Some("4.1 out of 5 stars"));
    }

    #[test]
    fn no_valid_candidate_yields_none() {
        let value = run_ladder(&page(), "price", &[Locator::Text(".missing")], validate_price)
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn bad_selector_is_an_error_not_a_panic() {
        let result = run_ladder(&page(), "name", &[Locator::Text("h1[[")], plausible_name);
        assert!(matches!(result, Err(PageError::Selector { .. })));
    }

    #[test]
    fn first_valid_stops_on_error() {
        let mut seen = Vec::new();
        let result: Result<Option<u32>, &str> = first_valid([1, 2, 3], |n| {
            seen.push(n);
            if n == 2 {
                Err("boom")
            } else {
                Ok(None)
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn image_reference_filters_placeholders() {
        assert_eq!(
            image_reference("//cdn.example.com/a.jpg").as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert_eq!(image_reference("data:image/gif;base64,AAAA"), None);
        assert_eq!(image_reference("/img/sprite-nav.png"), None);
        assert_eq!(
            image_reference("/images/tee.jpg").as_deref(),
            Some("/images/tee.jpg")
        );
    }
}
