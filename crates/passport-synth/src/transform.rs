use passport_core::{ProductPassport, RawExtractedProduct};
use uuid::Uuid;

use crate::fit::analyze_fit;
use crate::narration::{narrate, NarrationContext};
use crate::return_risk::assess_return_risk;
use crate::sustainability::score_sustainability;
use crate::themes::extract_themes;

/// Builds the passport for one extracted product.
///
/// Apart from the freshly generated `id`, every field is a deterministic
/// function of `product` and `source_snapshot_path`.
#[must_use]
pub fn transform(product: &RawExtractedProduct, source_snapshot_path: Option<String>) -> ProductPassport {
    transform_with_id(Uuid::new_v4(), product, source_snapshot_path)
}

/// [`transform`] with a caller-chosen id, for callers that name other
/// artifacts (page snapshots) after the passport.
#[must_use]
pub fn transform_with_id(
    id: Uuid,
    product: &RawExtractedProduct,
    source_snapshot_path: Option<String>,
) -> ProductPassport {
    let fit = analyze_fit(&product.reviews);
    let themes = extract_themes(&product.name, &product.reviews);
    let return_risk = assess_return_risk(product);
    let sustainability = score_sustainability(product);
    let narration = narrate(&NarrationContext {
        name: &product.name,
        price: product.price.as_deref(),
        rating: product.rating.as_deref(),
        fit: fit.as_ref(),
        themes: &themes,
        return_risk: &return_risk,
        sustainability: &sustainability,
    });

    tracing::debug!(
        name = %product.name,
        reviews = product.reviews.len(),
        themes = themes.len(),
        sustainability = sustainability.overall_score,
        return_risk = return_risk.score,
        "passport synthesized"
    );

    ProductPassport {
        id,
        source_snapshot_path,
        source_url: product.source_url.clone(),
        name: product.name.clone(),
        price: product.price.clone(),
        rating: product.rating.clone(),
        review_count: product.review_count.clone(),
        description: product.description.clone(),
        image_url: product.images.main.clone(),
        materials: product.materials.clone(),
        certifications: product.certifications.clone(),
        origin: product.origin.clone(),
        sustainability_badges: product.sustainability_badges.clone(),
        fit,
        themes,
        return_risk,
        sustainability,
        narration,
    }
}
