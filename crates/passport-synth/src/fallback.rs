//! Seeded stand-ins for return risk and sustainability when a product has
//! little or no review and material data (catalog previews, demos).
//!
//! Every output is a pure function of the product name (and rating text),
//! seeded as `"{name}:{purpose}"` through [`stable_hash`](crate::hash::stable_hash).

use passport_core::text::parse_rating;
use passport_core::{
    CategoryScore, ReturnRisk, RiskLabel, SustainabilityCategories, SustainabilityInfo,
};

use crate::hash::{sample_distinct, seeded_range};
use crate::sustainability::summarize;

const RETURN_REASONS: [&str; 15] = [
    "Sizing varies between colourways",
    "Colour may differ from product photos",
    "Fabric thinner than some shoppers expect",
    "Some buyers report loose stitching",
    "Fit is snug through the shoulders",
    "Material feels different than described",
    "Occasional shipping damage reported",
    "Length runs longer than listed",
    "Some units arrive with a strong odour",
    "Shrinkage reported after first wash",
    "Zippers and fasteners draw complaints",
    "Packaging can arrive crushed",
    "Sizing chart is hard to follow",
    "Item looks different in person",
    "Some buyers find it overpriced for the quality",
];

const DRIVER_COUNT: usize = 2;

fn two_decimals(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Seeded return risk for `name`. A parseable `rating_text` pulls the score
/// toward `(5 - rating) / 4`.
#[must_use]
pub fn generate_return_risk(name: &str, rating_text: Option<&str>) -> ReturnRisk {
    let seed = format!("{name}:return-risk");
    let jitter = f64::from(seeded_range(&seed, 0, 100)) / 100.0;
    let score = match rating_text.and_then(parse_rating) {
        Some(rating) => {
            let rating_risk = ((5.0 - f64::from(rating)) / 4.0).clamp(0.0, 1.0);
            0.6 * rating_risk + 0.4 * jitter
        }
        None => 0.1 + 0.7 * jitter,
    };
    let score = two_decimals(score.clamp(0.0, 1.0));

    let drivers = sample_distinct(&seed, &RETURN_REASONS, DRIVER_COUNT)
        .into_iter()
        .map(|reason| (*reason).to_owned())
        .collect();

    ReturnRisk {
        score,
        label: RiskLabel::from_score(score),
        drivers,
    }
}

fn seeded_category(name: &str, category: &str, detail: &str) -> CategoryScore {
    let score = seeded_range(&format!("{name}:sustainability:{category}"), 25, 90);
    CategoryScore {
        score: u8::try_from(score).unwrap_or(50),
        details: vec![detail.to_owned()],
    }
}

/// Seeded sustainability breakdown for `name`.
#[must_use]
pub fn generate_sustainability(name: &str) -> SustainabilityInfo {
    summarize(SustainabilityCategories {
        materials: seeded_category(name, "materials", "Estimated from similar products"),
        manufacturing: seeded_category(name, "manufacturing", "Origin not verified"),
        certifications: seeded_category(name, "certifications", "No certifications verified"),
        shipping: seeded_category(name, "shipping", "Typical retail shipping assumed"),
    })
}

/// Overall score of [`generate_sustainability`].
#[must_use]
pub fn fallback_sustainability_score(name: &str) -> u8 {
    generate_sustainability(name).overall_score
}
