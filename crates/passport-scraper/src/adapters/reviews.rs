//! Review location and per-review field extraction.
//!
//! Location strategies, in order, first non-empty wins:
//!
//! 1. review blocks rendered inline on the product page (JSON-LD `review`
//!    entries when no block exists);
//! 2. scroll to the retailer's review anchor, settle, read again;
//! 3. navigate to the retailer's dedicated reviews URL, settle, read again.

use passport_core::text::{clean_text, parse_rating, validate_rating};
use passport_core::{ExtractedReview, Retailer};

use super::product::ReviewProfile;
use super::ExtractOptions;
use crate::error::PageError;
use crate::jsonld::{product_reviews, star_rating};
use crate::ladder::{absent_on_error, run_ladder};
use crate::page::{ElementHandle, PageHandle, Scope};

/// Upper bound on review containers processed per page.
pub const MAX_REVIEW_ELEMENTS: usize = 25;

/// Review bodies must be longer than this many characters.
pub const MIN_REVIEW_CHARS: usize = 20;

fn review_body(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    (cleaned.chars().count() > MIN_REVIEW_CHARS).then_some(cleaned)
}

fn is_verified(element: &ElementHandle, profile: &ReviewProfile) -> Result<bool, PageError> {
    for selector in profile.verified {
        if element.select_first(selector)?.is_some() {
            return Ok(true);
        }
    }
    Ok(element.text().to_lowercase().contains("verified purchase"))
}

/// Reads one review container. `None` when it fails the keep rule: body text
/// above the minimum length, and a plausible star rating unless the retailer
/// uses rating-less feedback.
fn read_review(
    element: &ElementHandle,
    profile: &ReviewProfile,
    url: &str,
) -> Option<ExtractedReview> {
    let text = absent_on_error(
        "review.text",
        url,
        run_ladder(element, "review.text", profile.text, review_body),
    )?;
    let rating = absent_on_error(
        "review.rating",
        url,
        run_ladder(element, "review.rating", profile.rating, validate_rating),
    )
    .as_deref()
    .and_then(parse_rating)
    .and_then(|stars| star_rating(f64::from(stars)));
    let verified = absent_on_error("review.verified", url, is_verified(element, profile));

    if rating.is_none() && !profile.feedback_style {
        return None;
    }
    Some(ExtractedReview {
        text,
        rating,
        verified,
    })
}

/// Reviews visible in the current document.
///
/// # Errors
///
/// Returns [`PageError`] when a container selector is invalid or no document
/// is loaded.
pub(crate) fn read_reviews(
    page: &dyn PageHandle,
    profile: &ReviewProfile,
) -> Result<Vec<ExtractedReview>, PageError> {
    let url = page.url().to_owned();
    let mut containers = Vec::new();
    for selector in profile.blocks {
        containers = page.query_selector_all(selector)?;
        if !containers.is_empty() {
            break;
        }
    }

    if containers.is_empty() {
        let embedded = page
            .json_ld_products()?
            .iter()
            .flat_map(product_reviews)
            .filter(|review| {
                review.text.chars().count() > MIN_REVIEW_CHARS
                    && (review.rating.is_some() || profile.feedback_style)
            })
            .take(MAX_REVIEW_ELEMENTS)
            .collect();
        return Ok(embedded);
    }

    Ok(containers
        .iter()
        .take(MAX_REVIEW_ELEMENTS)
        .filter_map(|element| read_review(element, profile, &url))
        .collect())
}

fn read_or_empty(
    page: &dyn PageHandle,
    profile: &ReviewProfile,
    stage: &str,
) -> Vec<ExtractedReview> {
    match read_reviews(page, profile) {
        Ok(reviews) => {
            tracing::debug!(stage, count = reviews.len(), "review strategy finished");
            reviews
        }
        Err(e) => {
            tracing::warn!(stage, url = page.url(), error = %e, "review strategy failed");
            Vec::new()
        }
    }
}

/// Runs the location strategies in order. Never fails; an exhausted ladder
/// yields an empty list.
pub(crate) async fn locate_reviews(
    page: &mut dyn PageHandle,
    profile: &ReviewProfile,
    retailer: Retailer,
    product_id: Option<&str>,
    options: &ExtractOptions,
) -> Vec<ExtractedReview> {
    let inline = read_or_empty(page, profile, "inline");
    if !inline.is_empty() {
        return inline;
    }

    if let Some(anchor) = profile.anchor {
        match page.scroll_to(anchor).await {
            Ok(true) => {
                page.wait_for(options.settle_delay_ms).await;
                let scrolled = read_or_empty(page, profile, "anchor");
                if !scrolled.is_empty() {
                    return scrolled;
                }
            }
            Ok(false) => tracing::debug!(anchor, "review anchor not present"),
            Err(e) => tracing::warn!(anchor, error = %e, "scroll to review anchor failed"),
        }
    }

    let Some(reviews_url) = product_id.and_then(|id| retailer.reviews_url(id)) else {
        return Vec::new();
    };
    if let Err(e) = page.goto_url(&reviews_url, options.navigation_timeout).await {
        tracing::warn!(url = %reviews_url, error = %e, "reviews page navigation failed");
        return Vec::new();
    }
    page.wait_for(options.settle_delay_ms).await;
    read_or_empty(page, profile, "reviews_page")
}
