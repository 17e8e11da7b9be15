//! Product data model shared by the adapters, the synthesis engine and the
//! HTTP shell.
//!
//! ## Absence is signal
//!
//! Every optional field on [`RawExtractedProduct`] may be missing because the
//! page did not expose it, because the markup changed, or because a field
//! extractor failed. Downstream scoring treats `None` / empty as "no signal",
//! never as an error.
//!
//! ## Review ratings
//!
//! [`ExtractedReview::rating`] is `None` when the review carries no star
//! rating at all (seller feedback, text-only reviews) and `Some(1..=5)` when a
//! real rating was read from the page. Zero is never stored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback product name when no name strategy yields a value.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Maximum number of items any search extraction may return.
pub const MAX_SEARCH_ITEMS: usize = 24;

/// A single customer review pulled from a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedReview {
    /// Review body, whitespace-collapsed.
    pub text: String,
    /// Star rating in `1..=5`, or `None` when the review has no rating signal.
    pub rating: Option<u8>,
    /// `true` when the page marks the reviewer as a verified purchaser.
    pub verified: bool,
}

impl ExtractedReview {
    /// Returns `true` for reviews with a real 1–2 star rating.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        matches!(self.rating, Some(1 | 2))
    }
}

/// Image references for a product page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImages {
    pub main: Option<String>,
}

/// Raw fields pulled out of one product page by a retailer adapter.
///
/// Price, rating and review-count stay in their vendor-formatted text form;
/// the synthesis engine parses what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtractedProduct {
    pub name: String,
    /// Canonical price text, e.g. `"$24.99"`.
    pub price: Option<String>,
    /// Rating text, e.g. `"4.5 out of 5 stars"`.
    pub rating: Option<String>,
    /// Compact review-count text, e.g. `"(109K)"`.
    pub review_count: Option<String>,
    pub description: Option<String>,
    pub materials: Vec<String>,
    pub certifications: Vec<String>,
    pub origin: Option<String>,
    pub sustainability_badges: Vec<String>,
    pub reviews: Vec<ExtractedReview>,
    pub images: ProductImages,
    pub source_url: String,
}

impl RawExtractedProduct {
    /// An empty extraction for `source_url`: unknown name, every optional
    /// field absent.
    #[must_use]
    pub fn empty(source_url: impl Into<String>) -> Self {
        Self {
            name: UNKNOWN_PRODUCT_NAME.to_owned(),
            price: None,
            rating: None,
            review_count: None,
            description: None,
            materials: Vec::new(),
            certifications: Vec::new(),
            origin: None,
            sustainability_badges: Vec::new(),
            reviews: Vec::new(),
            images: ProductImages::default(),
            source_url: source_url.into(),
        }
    }
}

/// One entry of a search or listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub name: String,
    /// Absolute product URL. Uniqueness is enforced on the normalized product
    /// key derived from it, not on the raw string.
    pub product_url: String,
    pub price: Option<String>,
    pub price_value: Option<f64>,
    pub rating: Option<String>,
    /// Parsed rating in `[0, 5]`.
    pub rating_value: Option<f32>,
    pub review_count: Option<String>,
    pub image_url: Option<String>,
    /// Sustainability score in `[0, 100]`.
    pub sustainability_score: Option<u8>,
    pub climate_friendly: bool,
}

impl SearchResultItem {
    /// A bare item with only a name and URL.
    #[must_use]
    pub fn new(name: impl Into<String>, product_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product_url: product_url.into(),
            price: None,
            price_value: None,
            rating: None,
            rating_value: None,
            review_count: None,
            image_url: None,
            sustainability_score: None,
            climate_friendly: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitVerdict {
    #[serde(rename = "Runs small")]
    RunsSmall,
    #[serde(rename = "True to size")]
    TrueToSize,
    #[serde(rename = "Runs large")]
    RunsLarge,
}

impl FitVerdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FitVerdict::RunsSmall => "Runs small",
            FitVerdict::TrueToSize => "True to size",
            FitVerdict::RunsLarge => "Runs large",
        }
    }
}

impl std::fmt::Display for FitVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sizing verdict derived from review text voting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitSummary {
    pub verdict: FitVerdict,
    /// Share of reviews that voted, capped at `0.95`.
    pub confidence: f64,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A recurring topic across reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTheme {
    pub label: String,
    /// Fraction of all reviews that mention the theme, in `[0, 1]`.
    pub share: f64,
    pub severity: Severity,
    /// Two to four review excerpts.
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// Maps a `[0, 1]` risk score onto its label (`<0.3` Low, `<0.6` Medium).
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskLabel::Low
        } else if score < 0.6 {
            RiskLabel::Medium
        } else {
            RiskLabel::High
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Medium => "Medium",
            RiskLabel::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRisk {
    /// Score in `[0, 1]`.
    pub score: f64,
    pub label: RiskLabel,
    pub drivers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SustainabilityRating {
    Excellent,
    Good,
    Fair,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl SustainabilityRating {
    /// Step function over a `[0, 100]` score at 20/40/60/80.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => SustainabilityRating::Excellent,
            60..=79 => SustainabilityRating::Good,
            40..=59 => SustainabilityRating::Fair,
            20..=39 => SustainabilityRating::Poor,
            _ => SustainabilityRating::VeryPoor,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SustainabilityRating::Excellent => "Excellent",
            SustainabilityRating::Good => "Good",
            SustainabilityRating::Fair => "Fair",
            SustainabilityRating::Poor => "Poor",
            SustainabilityRating::VeryPoor => "Very Poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    /// Score in `[0, 100]`.
    pub score: u8,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityCategories {
    pub materials: CategoryScore,
    pub manufacturing: CategoryScore,
    pub certifications: CategoryScore,
    pub shipping: CategoryScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityInfo {
    pub overall_score: u8,
    pub rating: SustainabilityRating,
    pub categories: SustainabilityCategories,
}

/// Spoken-friendly text derived from the rest of the passport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narration {
    pub short: String,
    pub medium: String,
}

/// The synthesized, user-facing summary of one extracted product.
///
/// Built once per extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPassport {
    pub id: Uuid,
    pub source_snapshot_path: Option<String>,
    pub source_url: String,
    pub name: String,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub materials: Vec<String>,
    pub certifications: Vec<String>,
    pub origin: Option<String>,
    pub sustainability_badges: Vec<String>,
    pub fit: Option<FitSummary>,
    pub themes: Vec<ReviewTheme>,
    pub return_risk: ReturnRisk,
    pub sustainability: SustainabilityInfo,
    pub narration: Narration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_product_uses_unknown_name() {
        let product = RawExtractedProduct::empty("https://www.amazon.com/dp/B000000001");
        assert_eq!(product.name, UNKNOWN_PRODUCT_NAME);
        assert!(product.price.is_none());
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn risk_label_thresholds() {
        assert_eq!(RiskLabel::from_score(0.0), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(0.299), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(0.3), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(0.583), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(0.6), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(1.0), RiskLabel::High);
    }

    #[test]
    fn sustainability_rating_is_monotone_step() {
        let mut previous = SustainabilityRating::from_score(0);
        assert_eq!(previous, SustainabilityRating::VeryPoor);
        let rank = |r: SustainabilityRating| match r {
            SustainabilityRating::VeryPoor => 0,
            SustainabilityRating::Poor => 1,
            SustainabilityRating::Fair => 2,
            SustainabilityRating::Good => 3,
            SustainabilityRating::Excellent => 4,
        };
        for score in 0..=100u8 {
            let current = SustainabilityRating::from_score(score);
            assert!(rank(current) >= rank(previous), "dropped at {score}");
            previous = current;
        }
        assert_eq!(SustainabilityRating::from_score(20), SustainabilityRating::Poor);
        assert_eq!(SustainabilityRating::from_score(40), SustainabilityRating::Fair);
        assert_eq!(SustainabilityRating::from_score(60), SustainabilityRating::Good);
        assert_eq!(SustainabilityRating::from_score(80), SustainabilityRating::Excellent);
    }

    #[test]
    fn verdict_serializes_as_display_text() {
        let json = serde_json::to_string(&FitVerdict::RunsSmall).expect("serialize");
        assert_eq!(json, "\"Runs small\"");
        let json = serde_json::to_string(&SustainabilityRating::VeryPoor).expect("serialize");
        assert_eq!(json, "\"Very Poor\"");
    }

    #[test]
    fn review_negativity_requires_real_rating() {
        let review = |rating| ExtractedReview {
            text: "text".to_owned(),
            rating,
            verified: false,
        };
        assert!(review(Some(1)).is_negative());
        assert!(review(Some(2)).is_negative());
        assert!(!review(Some(3)).is_negative());
        assert!(!review(None).is_negative());
    }
}
