//! Recurring review topics from a fixed taxonomy.

use passport_core::text::truncate_excerpt;
use passport_core::{ExtractedReview, ReviewTheme, Severity};

use crate::hash::seeded_index;
use crate::keywords::{contains_any, sentiment_hits};

/// Minimum number of matching reviews before a theme is reported.
pub const MIN_THEME_REVIEWS: usize = 2;

const MAX_EVIDENCE: usize = 4;
const EXCERPT_CHARS: usize = 140;
const MIN_SENTIMENT_HITS: usize = 2;
const SENTIMENT_DOMINANCE: f64 = 1.5;

struct Theme {
    label: &'static str,
    keywords: &'static [&'static str],
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

const TAXONOMY: [Theme; 5] = [
    Theme {
        label: "Comfort",
        keywords: &["comfort", "comfortable", "comfy", "soft", "cozy", "itchy", "scratchy", "breathable", "stiff"],
        positive: &["comfortable", "comfy", "soft", "cozy", "breathable"],
        negative: &["uncomfortable", "itchy", "scratchy", "stiff", "rough"],
    },
    Theme {
        label: "Quality",
        keywords: &["quality", "durable", "well made", "well-made", "sturdy", "cheaply made", "fell apart", "ripped", "tore", "pilling", "faded", "shrunk"],
        positive: &["durable", "well made", "well-made", "sturdy", "high quality", "great quality"],
        negative: &["cheaply made", "fell apart", "ripped", "tore", "pilling", "faded", "shrunk", "poor quality"],
    },
    Theme {
        label: "Value",
        keywords: &["price", "value", "worth", "money", "expensive", "cheap", "overpriced", "bargain"],
        positive: &["great value", "good value", "worth it", "worth the money", "bargain", "affordable"],
        negative: &["overpriced", "not worth", "waste of money", "too expensive", "rip off"],
    },
    Theme {
        label: "Style",
        keywords: &["color", "colour", "style", "look", "looks", "design", "cute", "pattern", "stylish"],
        positive: &["cute", "stylish", "beautiful", "gorgeous", "love the color", "looks great"],
        negative: &["ugly", "looks cheap", "different color", "not as pictured", "dull"],
    },
    Theme {
        label: "Sizing",
        keywords: &["size", "sizing", "fit", "fits", "small", "large", "tight", "loose", "length"],
        positive: &["true to size", "fits perfectly", "perfect fit", "fits well"],
        negative: &["runs small", "runs large", "too small", "too big", "too tight", "too loose"],
    },
];

/// Mean of the real star ratings, mapped to a severity.
fn rating_severity(matched: &[&ExtractedReview]) -> Option<Severity> {
    let ratings: Vec<f64> = matched
        .iter()
        .filter_map(|review| review.rating)
        .filter(|rating| *rating > 0)
        .map(f64::from)
        .collect();
    if ratings.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some(if mean >= 4.0 {
        Severity::Low
    } else if mean >= 3.0 {
        Severity::Medium
    } else {
        Severity::High
    })
}

/// Positive vs negative keyword hits across the matching reviews.
fn sentiment_severity(theme: &Theme, texts: &[String]) -> Option<Severity> {
    let (positive, negative) = texts
        .iter()
        .map(|t| sentiment_hits(t, theme.positive, theme.negative))
        .fold((0, 0), |(p, n), (tp, tn)| (p + tp, n + tn));
    if positive + negative < MIN_SENTIMENT_HITS {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let (positive, negative) = (positive as f64, negative as f64);
    Some(if negative > positive * SENTIMENT_DOMINANCE {
        Severity::High
    } else if positive > negative * SENTIMENT_DOMINANCE {
        Severity::Low
    } else {
        Severity::Medium
    })
}

/// Severity seeded by `product:label:matches`, bucketed 0-34 / 35-69 / 70-99.
#[must_use]
pub fn seeded_severity(product_name: &str, label: &str, match_count: usize) -> Severity {
    match seeded_index(&format!("{product_name}:{label}:{match_count}"), 100) {
        0..=34 => Severity::Low,
        35..=69 => Severity::Medium,
        _ => Severity::High,
    }
}

/// Groups `reviews` into the themes mentioned by at least
/// [`MIN_THEME_REVIEWS`] of them, most-mentioned first.
#[must_use]
pub fn extract_themes(product_name: &str, reviews: &[ExtractedReview]) -> Vec<ReviewTheme> {
    if reviews.is_empty() {
        return Vec::new();
    }
    let lowered: Vec<String> = reviews.iter().map(|r| r.text.to_lowercase()).collect();

    let mut themes: Vec<(usize, ReviewTheme)> = TAXONOMY
        .iter()
        .filter_map(|theme| {
            let indices: Vec<usize> = lowered
                .iter()
                .enumerate()
                .filter(|(_, text)| contains_any(text, theme.keywords))
                .map(|(i, _)| i)
                .collect();
            if indices.len() < MIN_THEME_REVIEWS {
                return None;
            }

            let matched: Vec<&ExtractedReview> = indices.iter().map(|&i| &reviews[i]).collect();
            let texts: Vec<String> = indices.iter().map(|&i| lowered[i].clone()).collect();
            let severity = rating_severity(&matched)
                .or_else(|| sentiment_severity(theme, &texts))
                .unwrap_or_else(|| seeded_severity(product_name, theme.label, indices.len()));

            #[allow(clippy::cast_precision_loss)]
            let share = indices.len() as f64 / reviews.len() as f64;
            let evidence = matched
                .iter()
                .take(MAX_EVIDENCE)
                .map(|review| truncate_excerpt(&review.text, EXCERPT_CHARS))
                .collect();

            Some((
                indices.len(),
                ReviewTheme {
                    label: theme.label.to_owned(),
                    share,
                    severity,
                    evidence,
                },
            ))
        })
        .collect();

    // Stable sort keeps taxonomy order among equal counts.
    themes.sort_by(|a, b| b.0.cmp(&a.0));
    themes.into_iter().map(|(_, theme)| theme).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(text: &str, rating: Option<u8>) -> ExtractedReview {
        ExtractedReview {
            text: text.to_owned(),
            rating,
            verified: false,
        }
    }

    #[test]
    fn theme_needs_two_matching_reviews() {
        let reviews = vec![
            review("So comfortable", Some(5)),
            review("Arrived on time", Some(4)),
        ];
        assert!(extract_themes("Tee", &reviews).is_empty());
    }

    #[test]
    fn rating_mean_sets_severity() {
        let reviews = vec![
            review("Very comfortable and soft", Some(5)),
            review("Comfortable enough", Some(4)),
            review("Itchy seams", Some(2)),
            review("The quality fell apart", Some(1)),
            review("Poor quality, ripped", Some(2)),
        ];
        let themes = extract_themes("Tee", &reviews);
        let comfort = themes.iter().find(|t| t.label == "Comfort").expect("comfort");
        // mean of 5, 4, 2
        assert_eq!(comfort.severity, Severity::Medium);
        assert!((comfort.share - 0.6).abs() < 1e-9);
        assert_eq!(comfort.evidence.len(), 3);

        let quality = themes.iter().find(|t| t.label == "Quality").expect("quality");
        assert_eq!(quality.severity, Severity::High);
    }

    #[test]
    fn sentiment_used_without_ratings() {
        let reviews = vec![
            review("Overpriced for what it is, not worth it", None),
            review("Too expensive, waste of money", None),
        ];
        let themes = extract_themes("Tote", &reviews);
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].label, "Value");
        // negative: overpriced, not worth, too expensive, waste of money
        assert_eq!(themes[0].severity, Severity::High);
    }

    #[test]
    fn seeded_severity_without_any_signal() {
        let reviews = vec![
            review("The color is what I ordered", None),
            review("Color as shown", None),
        ];
        let themes = extract_themes("Organic Tee", &reviews);
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].severity, seeded_severity("Organic Tee", "Style", 2));
        assert_eq!(
            extract_themes("Organic Tee", &reviews),
            themes,
            "same input must give the same themes"
        );
    }

    #[test]
    fn seeded_severity_buckets() {
        for i in 0..50 {
            let name = format!("product-{i}");
            let bucket = seeded_index(&format!("{name}:Comfort:3"), 100);
            let expected = match bucket {
                0..=34 => Severity::Low,
                35..=69 => Severity::Medium,
                _ => Severity::High,
            };
            assert_eq!(seeded_severity(&name, "Comfort", 3), expected);
        }
    }

    #[test]
    fn plural_and_inflected_keywords_match() {
        let reviews = vec![
            review("love the colors, they really pop", None),
            review("nice colors and fun patterns overall", None),
        ];
        let themes = extract_themes("Tee", &reviews);
        let style = themes.iter().find(|t| t.label == "Style").expect("style theme");
        assert!((style.share - 1.0).abs() < 1e-9);
        assert_eq!(style.evidence.len(), 2);
    }

    #[test]
    fn uncomfortable_is_not_counted_as_praise() {
        let reviews = vec![
            review("Uncomfortable and itchy after an hour", None),
            review("So uncomfortable, the seams are scratchy", None),
        ];
        let themes = extract_themes("Tee", &reviews);
        let comfort = themes.iter().find(|t| t.label == "Comfort").expect("comfort theme");
        assert_eq!(comfort.severity, Severity::High);
    }

    #[test]
    fn sorted_by_match_count() {
        let reviews = vec![
            review("great price, good value", Some(5)),
            review("good value, comfortable", Some(5)),
            review("worth the money", Some(5)),
            review("soft and comfy", Some(5)),
        ];
        let themes = extract_themes("Tee", &reviews);
        let labels: Vec<&str> = themes.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Value", "Comfort"]);
    }
}
