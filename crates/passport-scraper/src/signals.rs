//! Sustainability signal extraction.
//!
//! Three independent passes feed one result:
//!
//! 1. details/spec table rows whose label names a material, origin or
//!    certification, taking the adjacent value cell;
//! 2. regexes over the visible body text (fabric composition, "Made in …",
//!    known certification names);
//! 3. vendor badge markers plus bullet/feature text mentioning
//!    sustainability keywords.
//!
//! Each pass sits behind its own failure boundary. Results are unioned with
//! case-insensitive substring de-duplication, keeping the more specific
//! (longer) string.

use std::sync::LazyLock;

use passport_core::text::clean_text;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::PageError;
use crate::ladder::{absent_on_error, plausible_label};
use crate::page::{parse_selector, visible_text, PageExt, PageHandle, Scope};

static COMPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,3}\s?%\s*(?:(?:recycled|organic|certified|virgin|merino|pima|supima)\s+)?(?:cotton|polyester|nylon|polyamide|wool|linen|hemp|bamboo|silk|spandex|elastane|lyocell|tencel|modal|acrylic|rayon|viscose|cashmere|leather|down)\b",
    )
    .expect("valid composition regex")
});

static QUALIFIED_MATERIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:organic|recycled|reclaimed|upcycled|plant-based|bio-based)\s+(?:cotton|polyester|nylon|wool|cashmere|down|leather|linen|plastic|materials?|fibers?|fibres?)\b",
    )
    .expect("valid qualified material regex")
});

static MADE_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[Mm]ade in (?:the )?([A-Z][A-Za-z]+(?: [A-Z][A-Za-z]+)?)")
        .expect("valid made-in regex")
});

static ROW_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[,;/]\s*|\s+and\s+").expect("valid list split regex"));

static TABLE_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th, td, dt, dd").expect("valid cell selector"));

const MATERIAL_LABELS: &[&str] = &[
    "material",
    "fabric",
    "composition",
    "fiber",
    "fibre",
    "made from",
    "shell",
    "lining",
];

const ORIGIN_LABELS: &[&str] = &[
    "country of origin",
    "origin",
    "made in",
    "manufactured in",
    "country of manufacture",
];

const CERTIFICATION_LABELS: &[&str] = &["certification", "certified", "standard"];

/// Certification names with the aliases that identify them in free text.
const CERTIFICATIONS: &[(&str, &[&str])] = &[
    ("GOTS", &["gots", "global organic textile standard"]),
    ("OEKO-TEX", &["oeko-tex", "oeko tex", "oekotex"]),
    ("Fair Trade Certified", &["fair trade", "fairtrade"]),
    ("bluesign", &["bluesign"]),
    ("B Corp", &["b corp", "b-corp", "certified b corporation"]),
    ("FSC", &["fsc-certified", "fsc certified", "forest stewardship council"]),
    ("Cradle to Cradle", &["cradle to cradle", "cradle-to-cradle"]),
    ("Global Recycled Standard", &["global recycled standard", "grs certified"]),
    ("Responsible Wool Standard", &["responsible wool standard"]),
    ("Responsible Down Standard", &["responsible down standard"]),
    ("USDA Organic", &["usda organic"]),
    ("Rainforest Alliance", &["rainforest alliance"]),
    ("Energy Star", &["energy star"]),
    ("Climate Pledge Friendly", &["climate pledge friendly"]),
    ("Carbon Neutral", &["carbon neutral", "climate neutral"]),
    ("Leaping Bunny", &["leaping bunny"]),
    ("1% for the Planet", &["1% for the planet"]),
];

/// Phrases that mark a bullet or badge as sustainability-related.
const SUSTAINABILITY_KEYWORDS: &[&str] = &[
    "recycled",
    "organic",
    "sustainab",
    "eco-friendly",
    "eco friendly",
    "biodegradable",
    "compostable",
    "carbon neutral",
    "climate",
    "renewable",
    "plastic-free",
    "plastic free",
    "responsibly sourced",
    "ethically",
    "fair trade",
    "compact packaging",
    "minimal packaging",
    "frustration-free packaging",
    "low impact",
];

/// Where a retailer keeps its spec table, badges and feature bullets.
#[derive(Debug, Clone, Copy)]
pub struct SignalProfile {
    /// Row-like elements of the details/spec section.
    pub spec_rows: &'static [&'static str],
    /// Vendor-specific sustainability badge markers.
    pub badges: &'static [&'static str],
    /// Feature bullets.
    pub bullets: &'static [&'static str],
}

/// Union of all sustainability signals found on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SustainabilitySignals {
    pub materials: Vec<String>,
    pub certifications: Vec<String>,
    pub origin: Option<String>,
    pub badges: Vec<String>,
}

impl SustainabilitySignals {
    /// Folds `other` in. The first origin seen is kept.
    pub fn absorb(&mut self, other: SustainabilitySignals) {
        merge_unique(&mut self.materials, other.materials);
        merge_unique(&mut self.certifications, other.certifications);
        merge_unique(&mut self.badges, other.badges);
        if self.origin.is_none() {
            self.origin = other.origin;
        }
    }
}

/// Appends `items` to `existing`, skipping anything already covered by
/// case-insensitive substring containment and upgrading an entry when the
/// new item contains it.
pub fn merge_unique(existing: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        let lower = item.to_lowercase();
        if lower.is_empty() {
            continue;
        }
        if existing.iter().any(|e| e.to_lowercase().contains(&lower)) {
            continue;
        }
        if let Some(slot) = existing
            .iter_mut()
            .find(|e| lower.contains(&e.to_lowercase()))
        {
            *slot = item;
            continue;
        }
        existing.push(item);
    }
}

fn label_matches(label: &str, set: &[&str]) -> bool {
    let lower = label.to_lowercase();
    set.iter().any(|keyword| lower.contains(keyword))
}

fn split_list(value: &str) -> Vec<String> {
    ROW_SPLIT
        .split(value)
        .filter_map(plausible_label)
        .collect()
}

/// Certification names mentioned in `text`.
#[must_use]
pub fn certifications_in(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    CERTIFICATIONS
        .iter()
        .filter(|(_, aliases)| aliases.iter().any(|alias| lower.contains(alias)))
        .map(|(name, _)| (*name).to_owned())
        .collect()
}

fn strip_origin_prefix(value: &str) -> String {
    let cleaned = clean_text(value);
    let lower = cleaned.to_lowercase();
    for prefix in ["made in the ", "made in ", "imported from "] {
        if lower.starts_with(prefix) {
            if let Some(rest) = cleaned.get(prefix.len()..) {
                return rest.trim().to_owned();
            }
        }
    }
    cleaned
}

/// Label/value pair of one spec row: two or more cells, or `Label: value`.
fn row_pair(row: ElementRef<'_>) -> Option<(String, String)> {
    let cells: Vec<String> = row
        .select(&TABLE_CELL)
        .map(visible_text)
        .filter(|t| !t.is_empty())
        .collect();
    if cells.len() >= 2 {
        return Some((cells[0].clone(), cells[1..].join(" ")));
    }
    let text = visible_text(row);
    let (label, value) = text.split_once(':')?;
    let value = value.trim();
    (!value.is_empty()).then(|| (label.trim().to_owned(), value.to_owned()))
}

fn scan_rows(doc: &Html, selectors: &[Selector]) -> SustainabilitySignals {
    let mut found = SustainabilitySignals::default();
    for selector in selectors {
        for row in doc.select(selector) {
            let Some((label, value)) = row_pair(row) else {
                continue;
            };
            if label_matches(&label, ORIGIN_LABELS) {
                if found.origin.is_none() {
                    found.origin = plausible_label(&strip_origin_prefix(&value));
                }
            } else if label_matches(&label, MATERIAL_LABELS) {
                merge_unique(&mut found.materials, split_list(&value));
            } else if label_matches(&label, CERTIFICATION_LABELS) {
                let named = certifications_in(&value);
                if named.is_empty() {
                    merge_unique(&mut found.certifications, split_list(&value));
                } else {
                    merge_unique(&mut found.certifications, named);
                }
            }
        }
    }
    found
}

/// Pass 1: spec/details table rows.
///
/// # Errors
///
/// Returns [`PageError`] for an invalid row selector or a missing document.
pub fn spec_table_pass<P: PageHandle + ?Sized>(
    page: &P,
    profile: &SignalProfile,
) -> Result<SustainabilitySignals, PageError> {
    let selectors = profile
        .spec_rows
        .iter()
        .map(|s| parse_selector(s))
        .collect::<Result<Vec<_>, _>>()?;
    page.evaluate(|doc| scan_rows(doc, &selectors))
}

/// Pass 2: regexes over free body text.
///
/// # Errors
///
/// Returns [`PageError::NotLoaded`] before navigation.
pub fn body_text_pass<S: Scope + ?Sized>(scope: &S) -> Result<SustainabilitySignals, PageError> {
    let text = scope.scope_text()?;
    let mut found = SustainabilitySignals::default();

    let compositions = COMPOSITION
        .find_iter(&text)
        .map(|m| clean_text(m.as_str()))
        .collect::<Vec<_>>();
    merge_unique(&mut found.materials, compositions);
    let qualified = QUALIFIED_MATERIAL
        .find_iter(&text)
        .map(|m| clean_text(m.as_str()))
        .collect::<Vec<_>>();
    merge_unique(&mut found.materials, qualified);

    found.certifications = certifications_in(&text);
    found.origin = MADE_IN
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| plausible_label(m.as_str()));
    Ok(found)
}

/// Pass 3: vendor badges and sustainability-flavoured bullets.
///
/// # Errors
///
/// Returns [`PageError`] for an invalid selector or a missing document.
pub fn badge_pass<S: Scope + ?Sized>(
    scope: &S,
    profile: &SignalProfile,
) -> Result<SustainabilitySignals, PageError> {
    let mut found = SustainabilitySignals::default();

    for selector in profile.badges {
        let labels = scope
            .select_all(selector)?
            .iter()
            .filter_map(|el| {
                plausible_label(el.text())
                    .or_else(|| el.attr("aria-label").and_then(plausible_label))
                    .or_else(|| el.attr("alt").and_then(plausible_label))
            })
            .collect::<Vec<_>>();
        merge_unique(&mut found.badges, labels);
    }

    for selector in profile.bullets {
        for bullet in scope.select_all(selector)? {
            let text = bullet.text();
            if label_matches(text, SUSTAINABILITY_KEYWORDS) {
                merge_unique(
                    &mut found.badges,
                    std::iter::once(passport_core::text::truncate_excerpt(text, 120)),
                );
            }
            merge_unique(&mut found.certifications, certifications_in(text));
        }
    }
    Ok(found)
}

/// Runs all three passes, each behind its own failure boundary, and unions
/// the results.
pub fn extract_signals<P: PageHandle + ?Sized>(
    page: &P,
    profile: &SignalProfile,
) -> SustainabilitySignals {
    let url = page.url().to_owned();
    let mut signals = absent_on_error("spec_table", &url, spec_table_pass(page, profile));
    signals.absorb(absent_on_error("body_text", &url, body_text_pass(page)));
    signals.absorb(absent_on_error("badges", &url, badge_pass(page, profile)));
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;

    const PROFILE: SignalProfile = SignalProfile {
        spec_rows: &["table.specs tr", "ul.details li"],
        badges: &[".eco-badge"],
        bullets: &["ul.features li"],
    };

    #[test]
    fn merge_unique_keeps_more_specific_string() {
        let mut items = vec!["Cotton".to_string()];
        merge_unique(
            &mut items,
            vec![
                "organic cotton".to_string(),
                "COTTON".to_string(),
                "Hemp".to_string(),
            ],
        );
        assert_eq!(items, vec!["organic cotton".to_string(), "Hemp".to_string()]);
    }

    #[test]
    fn spec_table_reads_adjacent_cells_and_colon_rows() {
        let page = StaticPage::new(
            "https://shop.example.com/p/1",
            r"<table class='specs'>
                <tr><th>Fabric Type</th><td>60% Organic Cotton, 40% Recycled Polyester</td></tr>
                <tr><th>Country of Origin</th><td>Made in Portugal</td></tr>
                <tr><th>Care</th><td>Machine wash</td></tr>
              </table>
              <ul class='details'><li>Certifications: GOTS; OEKO-TEX Standard 100</li></ul>",
        );
        let found = spec_table_pass(&page, &PROFILE).unwrap();
        assert_eq!(
            found.materials,
            vec![
                "60% Organic Cotton".to_string(),
                "40% Recycled Polyester".to_string()
            ]
        );
        assert_eq!(found.origin.as_deref(), Some("Portugal"));
        assert_eq!(
            found.certifications,
            vec!["GOTS".to_string(), "OEKO-TEX".to_string()]
        );
    }

    #[test]
    fn body_text_pass_finds_composition_origin_and_certifications() {
        let page = StaticPage::new(
            "https://shop.example.com/p/1",
            "<p>Shell: 100% recycled nylon. Made in the United States. bluesign approved.</p>",
        );
        let found = body_text_pass(&page).unwrap();
        assert_eq!(found.materials, vec!["100% recycled nylon".to_string()]);
        assert_eq!(found.origin.as_deref(), Some("United States"));
        assert_eq!(found.certifications, vec!["bluesign".to_string()]);
    }

    #[test]
    fn badge_pass_reads_markers_and_keyword_bullets() {
        let page = StaticPage::new(
            "https://shop.example.com/p/1",
            r"<span class='eco-badge'>Climate Pledge Friendly</span>
              <ul class='features'>
                <li>Ships in compact packaging to cut waste</li>
                <li>Relaxed fit</li>
                <li>Fair Trade sewn</li>
              </ul>",
        );
        let found = badge_pass(&page, &PROFILE).unwrap();
        assert_eq!(
            found.badges,
            vec![
                "Climate Pledge Friendly".to_string(),
                "Ships in compact packaging to cut waste".to_string(),
                "Fair Trade sewn".to_string(),
            ]
        );
        assert_eq!(found.certifications, vec!["Fair Trade Certified".to_string()]);
    }

    #[test]
    fn extract_signals_unions_passes_without_duplicates() {
        let page = StaticPage::new(
            "https://shop.example.com/p/1",
            r"<table class='specs'><tr><th>Material</th><td>Organic Cotton</td></tr></table>
              <p>Crafted from organic cotton. Made in Peru.</p>",
        );
        let found = extract_signals(&page, &PROFILE);
        assert_eq!(found.materials, vec!["Organic Cotton".to_string()]);
        assert_eq!(found.origin.as_deref(), Some("Peru"));
    }

    #[test]
    fn broken_pass_does_not_hide_the_others() {
        let profile = SignalProfile {
            spec_rows: &["tr[["],
            badges: &[],
            bullets: &[],
        };
        let page = StaticPage::new("https://shop.example.com/p/1", "<p>Made in Canada</p>");
        let found = extract_signals(&page, &profile);
        assert_eq!(found.origin.as_deref(), Some("Canada"));
    }
}
