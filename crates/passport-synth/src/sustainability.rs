//! Four-category sustainability score.
//!
//! | category       | weight |
//! |----------------|--------|
//! | materials      | 0.35   |
//! | manufacturing  | 0.25   |
//! | certifications | 0.30   |
//! | shipping       | 0.10   |
//!
//! Every category score is clamped to `[0, 100]`; the overall score is the
//! rounded weighted sum.

use passport_core::{
    CategoryScore, RawExtractedProduct, SustainabilityCategories, SustainabilityInfo,
    SustainabilityRating,
};

use crate::keywords::mentions_any;

const MATERIALS_WEIGHT: f64 = 0.35;
const MANUFACTURING_WEIGHT: f64 = 0.25;
const CERTIFICATIONS_WEIGHT: f64 = 0.30;
const SHIPPING_WEIGHT: f64 = 0.10;

/// Score of a category with no input at all.
pub const NEUTRAL_CATEGORY_SCORE: u8 = 50;

const EXCELLENT_MATERIALS: &[&str] = &[
    "organic", "recycled", "hemp", "linen", "tencel", "lyocell", "cork", "econyl", "upcycled",
];
const GOOD_MATERIALS: &[&str] = &[
    "cotton", "wool", "merino", "bamboo", "modal", "silk", "cashmere", "alpaca", "leather",
];
const POOR_MATERIALS: &[&str] = &[
    "polyester", "nylon", "acrylic", "spandex", "elastane", "pvc", "vinyl", "polyurethane",
    "faux leather",
];

const STRONG_REGULATION: &[&str] = &[
    "usa", "u.s.a", "united states", "canada", "uk", "united kingdom", "england",
    "germany", "france", "italy", "portugal", "spain", "netherlands", "sweden", "denmark",
    "norway", "finland", "japan", "australia", "new zealand", "switzerland", "austria", "ireland",
    "belgium",
];
const MODERATE_REGULATION: &[&str] = &[
    "mexico", "turkey", "taiwan", "south korea", "korea", "poland", "czech republic", "romania",
    "peru", "brazil", "chile", "thailand", "malaysia", "sri lanka", "morocco",
];
const LIMITED_REGULATION: &[&str] = &[
    "china", "bangladesh", "vietnam", "india", "cambodia", "pakistan", "indonesia", "myanmar",
    "philippines", "ethiopia", "honduras",
];

const DOMESTIC_ORIGINS: &[&str] = &["usa", "u.s.a", "united states", "canada", "mexico"];
const OVERSEAS_ORIGINS: &[&str] = &[
    "china", "bangladesh", "vietnam", "india", "cambodia", "pakistan", "indonesia", "myanmar",
    "philippines", "imported",
];
const PACKAGING_BADGES: &[&str] = &[
    "compact", "minimal packaging", "reduced packaging", "plastic-free packaging",
    "frustration-free",
];

const TIER1_CERTIFICATIONS: &[&str] = &[
    "gots", "global organic textile standard", "fair trade", "fairtrade", "b corp",
    "b corporation", "bluesign", "cradle to cradle",
];
const TIER2_CERTIFICATIONS: &[&str] = &[
    "oeko-tex", "oeko tex", "fsc", "rainforest alliance", "usda organic", "energy star",
    "global recycled standard", "grs", "1% for the planet", "climate neutral",
];
const TIER3_CERTIFICATIONS: &[&str] = &[
    "recycled claim standard", "rcs", "organic content standard", "ocs",
    "responsible wool standard", "rws", "better cotton", "bci", "vegan", "peta",
    "leaping bunny", "climate pledge friendly",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaterialTier {
    Excellent,
    Good,
    Poor,
    Unknown,
}

fn classify_material(material: &str) -> MaterialTier {
    let lower = material.to_lowercase();
    if mentions_any(&lower, EXCELLENT_MATERIALS) {
        MaterialTier::Excellent
    } else if mentions_any(&lower, POOR_MATERIALS) {
        MaterialTier::Poor
    } else if mentions_any(&lower, GOOD_MATERIALS) {
        MaterialTier::Good
    } else {
        MaterialTier::Unknown
    }
}

fn clamp_score(raw: i32) -> u8 {
    u8::try_from(raw.clamp(0, 100)).unwrap_or(NEUTRAL_CATEGORY_SCORE)
}

fn score_materials(materials: &[String]) -> CategoryScore {
    if materials.is_empty() {
        return CategoryScore {
            score: NEUTRAL_CATEGORY_SCORE,
            details: vec![
                "Material composition not listed".to_owned(),
                "Check the product label for fibre content".to_owned(),
            ],
        };
    }

    let mut raw = 0i32;
    let mut excellent = 0usize;
    let mut details = Vec::with_capacity(materials.len());
    for material in materials {
        let tier = classify_material(material);
        let (delta, note) = match tier {
            MaterialTier::Excellent => (60, "low-impact material"),
            MaterialTier::Good => (30, "natural material"),
            MaterialTier::Poor => (-20, "synthetic, petroleum-based material"),
            MaterialTier::Unknown => (15, "impact unknown"),
        };
        if tier == MaterialTier::Excellent {
            excellent += 1;
        }
        raw += delta;
        details.push(format!("{material}: {note}"));
    }
    if excellent >= 2 {
        raw += 20;
        details.push("Multiple low-impact materials".to_owned());
    }

    CategoryScore {
        score: clamp_score(raw),
        details,
    }
}

fn score_manufacturing(origin: Option<&str>) -> CategoryScore {
    let Some(origin) = origin.filter(|o| !o.trim().is_empty()) else {
        return CategoryScore {
            score: NEUTRAL_CATEGORY_SCORE,
            details: vec!["Country of origin not disclosed".to_owned()],
        };
    };
    let lower = origin.to_lowercase();
    let (score, note) = if mentions_any(&lower, STRONG_REGULATION) {
        (85, "strong labour and environmental regulation")
    } else if mentions_any(&lower, MODERATE_REGULATION) {
        (65, "moderate labour and environmental regulation")
    } else if mentions_any(&lower, LIMITED_REGULATION) {
        (35, "limited labour and environmental regulation")
    } else {
        (50, "regulation level unknown")
    };
    CategoryScore {
        score,
        details: vec![format!("Made in {origin}: {note}")],
    }
}

fn certification_points(certification: &str) -> i32 {
    let lower = certification.to_lowercase();
    if mentions_any(&lower, TIER1_CERTIFICATIONS) {
        40
    } else if mentions_any(&lower, TIER2_CERTIFICATIONS) {
        25
    } else if mentions_any(&lower, TIER3_CERTIFICATIONS) {
        15
    } else {
        0
    }
}

fn score_certifications(certifications: &[String]) -> CategoryScore {
    if certifications.is_empty() {
        return CategoryScore {
            score: NEUTRAL_CATEGORY_SCORE,
            details: vec!["No third-party certifications listed".to_owned()],
        };
    }
    let mut raw = 0i32;
    let mut details = Vec::with_capacity(certifications.len());
    for certification in certifications {
        let points = certification_points(certification);
        raw += points;
        if points > 0 {
            details.push(format!("{certification} (+{points})"));
        } else {
            details.push(format!("{certification} (unrecognised)"));
        }
    }
    CategoryScore {
        score: clamp_score(raw),
        details,
    }
}

fn score_shipping(origin: Option<&str>, badges: &[String]) -> CategoryScore {
    let mut raw = 50i32;
    let mut details = Vec::new();
    if let Some(origin) = origin {
        let lower = origin.to_lowercase();
        if mentions_any(&lower, DOMESTIC_ORIGINS) {
            raw += 20;
            details.push("Ships a short distance from origin".to_owned());
        } else if mentions_any(&lower, OVERSEAS_ORIGINS) {
            raw -= 10;
            details.push("Ships from overseas".to_owned());
        }
    }
    if badges
        .iter()
        .any(|badge| mentions_any(&badge.to_lowercase(), PACKAGING_BADGES))
    {
        raw += 20;
        details.push("Reduced packaging".to_owned());
    }
    if details.is_empty() {
        details.push("Shipping footprint unknown".to_owned());
    }
    CategoryScore {
        score: clamp_score(raw),
        details,
    }
}

/// Weighted overall score from the four category scores.
#[must_use]
pub fn overall_score(categories: &SustainabilityCategories) -> u8 {
    let weighted = MATERIALS_WEIGHT * f64::from(categories.materials.score)
        + MANUFACTURING_WEIGHT * f64::from(categories.manufacturing.score)
        + CERTIFICATIONS_WEIGHT * f64::from(categories.certifications.score)
        + SHIPPING_WEIGHT * f64::from(categories.shipping.score);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = weighted.round().clamp(0.0, 100.0) as u8;
    rounded
}

/// Bundles category scores into the overall score and its rating label.
#[must_use]
pub fn summarize(categories: SustainabilityCategories) -> SustainabilityInfo {
    let overall = overall_score(&categories);
    SustainabilityInfo {
        overall_score: overall,
        rating: SustainabilityRating::from_score(overall),
        categories,
    }
}

/// Scores `product` from its materials, origin, certifications and badges.
#[must_use]
pub fn score_sustainability(product: &RawExtractedProduct) -> SustainabilityInfo {
    let origin = product.origin.as_deref();
    summarize(SustainabilityCategories {
        materials: score_materials(&product.materials),
        manufacturing: score_manufacturing(origin),
        certifications: score_certifications(&product.certifications),
        shipping: score_shipping(origin, &product.sustainability_badges),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn organic_and_recycled_materials_max_out() {
        let score = score_materials(&strings(&["Organic Cotton", "Recycled Polyester"]));
        assert_eq!(score.score, 100);
    }

    #[test]
    fn synthetic_only_materials_floor_at_zero() {
        assert_eq!(score_materials(&strings(&["Polyester", "Spandex"])).score, 0);
        assert_eq!(score_materials(&strings(&["Cotton", "Spandex"])).score, 10);
        assert_eq!(score_materials(&strings(&["Mystery Fibre"])).score, 15);
    }

    #[test]
    fn empty_inputs_score_neutral() {
        assert_eq!(score_materials(&[]).score, NEUTRAL_CATEGORY_SCORE);
        assert_eq!(score_manufacturing(None).score, NEUTRAL_CATEGORY_SCORE);
        assert_eq!(score_certifications(&[]).score, NEUTRAL_CATEGORY_SCORE);
        assert_eq!(score_shipping(None, &[]).score, 50);
    }

    #[test]
    fn origin_tiers() {
        assert_eq!(score_manufacturing(Some("USA")).score, 85);
        assert_eq!(score_manufacturing(Some("Made in Portugal")).score, 85);
        assert_eq!(score_manufacturing(Some("Mexico")).score, 65);
        assert_eq!(score_manufacturing(Some("China")).score, 35);
        assert_eq!(score_manufacturing(Some("Imported")).score, 50);
        assert_eq!(score_manufacturing(Some("Ukraine")).score, 50);
    }

    #[test]
    fn certifications_count_best_tier_once_and_cap() {
        assert_eq!(certification_points("GOTS certified organic"), 40);
        assert_eq!(certification_points("OEKO-TEX Standard 100"), 25);
        assert_eq!(certification_points("Vegan"), 15);
        assert_eq!(certification_points("Award winning"), 0);
        let many = strings(&["GOTS", "Fair Trade", "bluesign", "FSC"]);
        assert_eq!(score_certifications(&many).score, 100);
    }

    #[test]
    fn shipping_adjustments() {
        assert_eq!(score_shipping(Some("USA"), &[]).score, 70);
        assert_eq!(score_shipping(Some("China"), &[]).score, 40);
        let badges = strings(&["Compact by Design"]);
        assert_eq!(score_shipping(Some("USA"), &badges).score, 90);
    }

    #[test]
    fn overall_is_weighted_and_rounded() {
        let mut product = RawExtractedProduct::empty("https://x.test/p");
        product.materials = strings(&["Organic Cotton", "Recycled Polyester"]);
        product.origin = Some("USA".to_owned());
        product.certifications = strings(&["GOTS"]);
        let info = score_sustainability(&product);
        // 0.35*100 + 0.25*85 + 0.30*40 + 0.10*70 = 75.25
        assert_eq!(info.overall_score, 75);
        assert_eq!(info.rating, SustainabilityRating::Good);
    }
}
