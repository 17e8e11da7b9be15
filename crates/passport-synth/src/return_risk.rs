//! Return-risk estimate from review ratings.

use passport_core::text::{parse_rating, truncate_excerpt};
use passport_core::{ExtractedReview, RawExtractedProduct, ReturnRisk, RiskLabel};

/// Score reported when a product has no reviews at all.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Overall rating assumed when neither the product nor its reviews carry one.
const DEFAULT_OVERALL_RATING: f64 = 3.0;

const NEGATIVE_WEIGHT: f64 = 0.5;
const RATING_WEIGHT: f64 = 0.3;
const VERIFIED_WEIGHT: f64 = 0.2;
const MAX_DRIVERS: usize = 4;
const EXCERPT_CHARS: usize = 120;

#[allow(clippy::cast_precision_loss)]
fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Product-level rating text first, then the mean of real review ratings.
fn overall_rating(rating_text: Option<&str>, reviews: &[ExtractedReview]) -> f64 {
    if let Some(rating) = rating_text.and_then(parse_rating) {
        return f64::from(rating);
    }
    let rated: Vec<f64> = reviews
        .iter()
        .filter_map(|review| review.rating)
        .map(f64::from)
        .collect();
    if rated.is_empty() {
        return DEFAULT_OVERALL_RATING;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = rated.len() as f64;
    rated.iter().sum::<f64>() / count
}

/// Estimates how likely `product` is to be returned.
#[must_use]
pub fn assess_return_risk(product: &RawExtractedProduct) -> ReturnRisk {
    let reviews = &product.reviews;
    if reviews.is_empty() {
        return ReturnRisk {
            score: NEUTRAL_SCORE,
            label: RiskLabel::from_score(NEUTRAL_SCORE),
            drivers: vec!["Not enough review data to assess return risk".to_owned()],
        };
    }

    let negatives: Vec<&ExtractedReview> = reviews.iter().filter(|r| r.is_negative()).collect();
    let verified_negatives = negatives.iter().filter(|r| r.verified).count();

    let negative_share = fraction(negatives.len(), reviews.len());
    let overall = overall_rating(product.rating.as_deref(), reviews);
    let rating_risk = ((5.0 - overall) / 4.0).clamp(0.0, 1.0);
    let verified_share = fraction(verified_negatives, negatives.len());

    let score = (NEGATIVE_WEIGHT * negative_share
        + RATING_WEIGHT * rating_risk
        + VERIFIED_WEIGHT * verified_share)
        .clamp(0.0, 1.0);

    let mut drivers = vec![
        format!(
            "{:.0}% of reviews are negative (1-2 stars)",
            negative_share * 100.0
        ),
        format!("Overall rating {overall:.1} out of 5"),
    ];
    if verified_negatives > 0 {
        drivers.push(format!(
            "{verified_negatives} negative review(s) from verified purchasers"
        ));
    }
    if let Some(first) = negatives.first() {
        if drivers.len() < MAX_DRIVERS {
            drivers.push(format!(
                "Reviewer said: \"{}\"",
                truncate_excerpt(&first.text, EXCERPT_CHARS)
            ));
        }
    }

    tracing::debug!(score, negatives = negatives.len(), "return risk assessed");
    ReturnRisk {
        score,
        label: RiskLabel::from_score(score),
        drivers,
    }
}
