//! Text normalization for vendor-formatted price, rating and review-count
//! strings.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static PRICE_WITH_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([$£€¥])\s?(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?").expect("valid price regex")
});

static BARE_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:USD\s*)?(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?\s*$")
        .expect("valid bare price regex")
});

static RATING_OUT_OF_FIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d(?:\.\d+)?)\s*(?:out\s+)?of\s*5\b").expect("valid rating regex")
});

static BARE_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:rated\s+)?(\d(?:\.\d+)?)\s*(?:stars?)?\s*$")
        .expect("valid bare rating regex")
});

static REVIEW_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*(?:\.\d+)?)(?:\s?([KkMm])\b)?").expect("valid review count regex")
});

/// Prices outside this open range are treated as misreads.
const MAX_PLAUSIBLE_PRICE: f64 = 100_000.0;

/// Collapses runs of whitespace to single spaces and trims.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw, " ").trim().to_owned()
}

/// Shortens `text` to at most `max_chars` characters, ending in `...` when cut.
#[must_use]
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    let cleaned = clean_text(text);
    if cleaned.chars().count() <= max_chars {
        return cleaned;
    }
    let keep = max_chars.saturating_sub(3);
    let mut cut: String = cleaned.chars().take(keep).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

/// A normalized price.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    /// Canonical text, e.g. `"$1299.00"`.
    pub text: String,
    pub value: f64,
}

/// Formats `value` with two decimals behind `symbol`.
#[must_use]
pub fn format_price(value: f64, symbol: &str) -> String {
    format!("{symbol}{value:.2}")
}

fn price_from_parts(symbol: &str, whole: &str, cents: Option<&str>) -> Option<ParsedPrice> {
    let mut number = whole.replace(',', "");
    if let Some(cents) = cents {
        number.push('.');
        number.push_str(cents);
    }
    let value: f64 = number.parse().ok()?;
    if value <= 0.0 || value >= MAX_PLAUSIBLE_PRICE {
        return None;
    }
    Some(ParsedPrice {
        text: format_price(value, symbol),
        value,
    })
}

/// Parses the first plausible price in `raw`.
///
/// A currency-symbol amount anywhere in the text wins; otherwise the whole
/// string must be a bare number (attribute values like `content="24.99"`),
/// which is assumed to be dollars.
#[must_use]
pub fn parse_price(raw: &str) -> Option<ParsedPrice> {
    for caps in PRICE_WITH_SYMBOL.captures_iter(raw) {
        let parsed = price_from_parts(
            caps.get(1).map_or("$", |m| m.as_str()),
            caps.get(2)?.as_str(),
            caps.get(3).map(|m| m.as_str()),
        );
        if parsed.is_some() {
            return parsed;
        }
    }
    let caps = BARE_PRICE.captures(raw)?;
    price_from_parts("$", caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))
}

/// Ladder validator: canonical price text or rejection.
#[must_use]
pub fn validate_price(raw: &str) -> Option<String> {
    parse_price(raw).map(|price| price.text)
}

fn rating_capture(raw: &str) -> Option<(&str, f32)> {
    let caps = RATING_OUT_OF_FIVE
        .captures(raw)
        .or_else(|| BARE_RATING.captures(raw))?;
    let matched = caps.get(1)?.as_str();
    let value: f32 = matched.parse().ok()?;
    (0.0..=5.0).contains(&value).then_some((matched, value))
}

/// Parses a `0..=5` star rating from `"4.5 out of 5 stars"`, `"4.5"`,
/// `"Rated 4.5 stars"` and similar.
#[must_use]
pub fn parse_rating(raw: &str) -> Option<f32> {
    rating_capture(raw).map(|(_, value)| value)
}

/// Ladder validator: `"<n> out of 5 stars"` or rejection.
#[must_use]
pub fn validate_rating(raw: &str) -> Option<String> {
    rating_capture(raw).map(|(matched, _)| format!("{matched} out of 5 stars"))
}

/// Compact review-count text, preserving `K`/`M` suffixes.
///
/// `"109.1K"` → `"(109.1K)"`, `"1,234 ratings"` → `"(1234)"`, `""` → `None`.
#[must_use]
pub fn parse_review_count(raw: &str) -> Option<String> {
    let caps = REVIEW_COUNT.captures(raw)?;
    let digits = caps.get(1)?.as_str().replace(',', "");
    let suffix = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_uppercase())
        .unwrap_or_default();
    Some(format!("({digits}{suffix})"))
}

/// Expands a review-count string to a plain number for sorting.
///
/// `"(109.1K)"` → `109_100`.
#[must_use]
pub fn review_count_value(raw: &str) -> Option<u64> {
    let caps = REVIEW_COUNT.captures(raw)?;
    let base: f64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("K" | "k") => 1_000.0,
        Some("M" | "m") => 1_000_000.0,
        _ => 1.0,
    };
    let expanded = (base * multiplier).round();
    if expanded < 0.0 || !expanded.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = expanded as u64;
    Some(count)
}

/// Full review count with thousands separators: `"(109.1K)"` → `"109,100"`.
#[must_use]
pub fn format_review_count(raw: &str) -> Option<String> {
    let value = review_count_value(raw)?.to_string();
    let mut grouped = String::with_capacity(value.len() + value.len() / 3);
    for (index, digit) in value.chars().enumerate() {
        if index > 0 && (value.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    Some(grouped)
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
