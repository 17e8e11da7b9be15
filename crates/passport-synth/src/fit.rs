//! Sizing verdict from review text.
//!
//! Each review casts at most one vote: the first bucket (small, large, true
//! to size) with a keyword occurring anywhere in its lowercased text. A
//! summary needs at least [`MIN_REVIEWS`] reviews and [`MIN_VOTES`] votes.

use passport_core::text::truncate_excerpt;
use passport_core::{ExtractedReview, FitSummary, FitVerdict};

use crate::keywords::contains_any;

pub const MIN_REVIEWS: usize = 5;
pub const MIN_VOTES: usize = 3;
pub const MAX_CONFIDENCE: f64 = 0.95;

const MAX_EVIDENCE: usize = 3;
const EXCERPT_CHARS: usize = 100;

const RUNS_SMALL: &[&str] = &[
    "runs small",
    "run small",
    "running small",
    "fits small",
    "too small",
    "too tight",
    "a bit small",
    "smaller than expected",
    "size up",
    "sized up",
    "sizing up",
    "order a size up",
    "snug",
];

const RUNS_LARGE: &[&str] = &[
    "runs large",
    "run large",
    "runs big",
    "run big",
    "fits large",
    "too big",
    "too large",
    "too loose",
    "a bit big",
    "bigger than expected",
    "larger than expected",
    "size down",
    "sized down",
    "sizing down",
    "baggy",
];

const TRUE_TO_SIZE: &[&str] = &[
    "true to size",
    "fits true",
    "fit true",
    "perfect fit",
    "fits perfectly",
    "fit perfectly",
    "fits as expected",
    "exactly my size",
    "fits well",
];

fn vote(text: &str) -> Option<FitVerdict> {
    let lower = text.to_lowercase();
    [
        (FitVerdict::RunsSmall, RUNS_SMALL),
        (FitVerdict::RunsLarge, RUNS_LARGE),
        (FitVerdict::TrueToSize, TRUE_TO_SIZE),
    ]
    .into_iter()
    .find(|(_, keywords)| contains_any(&lower, keywords))
    .map(|(verdict, _)| verdict)
}

/// The bucket whose count is strictly greater than both others; any tie at
/// the top resolves to true to size.
fn verdict(small: usize, large: usize, true_to_size: usize) -> FitVerdict {
    if small > large && small > true_to_size {
        FitVerdict::RunsSmall
    } else if large > small && large > true_to_size {
        FitVerdict::RunsLarge
    } else {
        FitVerdict::TrueToSize
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}

/// Votes on sizing across `reviews`. `None` when there are too few reviews
/// or too few votes.
#[must_use]
pub fn analyze_fit(reviews: &[ExtractedReview]) -> Option<FitSummary> {
    if reviews.len() < MIN_REVIEWS {
        return None;
    }

    let votes: Vec<(FitVerdict, &ExtractedReview)> = reviews
        .iter()
        .filter_map(|review| vote(&review.text).map(|v| (v, review)))
        .collect();
    if votes.len() < MIN_VOTES {
        return None;
    }

    let count = |bucket: FitVerdict| votes.iter().filter(|(v, _)| *v == bucket).count();
    let verdict = verdict(
        count(FitVerdict::RunsSmall),
        count(FitVerdict::RunsLarge),
        count(FitVerdict::TrueToSize),
    );

    let excerpts = |wanted: &dyn Fn(FitVerdict) -> bool| -> Vec<String> {
        votes
            .iter()
            .filter(|(v, _)| wanted(*v))
            .take(MAX_EVIDENCE)
            .map(|(_, review)| truncate_excerpt(&review.text, EXCERPT_CHARS))
            .collect()
    };
    let mut evidence = excerpts(&|v| v != FitVerdict::TrueToSize);
    if evidence.is_empty() {
        evidence = excerpts(&|v| v == FitVerdict::TrueToSize);
    }

    Some(FitSummary {
        verdict,
        confidence: ratio(votes.len(), reviews.len()).min(MAX_CONFIDENCE),
        evidence,
    })
}
