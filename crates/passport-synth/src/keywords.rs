//! Keyword matching over lowercased text.
//!
//! Review analysis (fit, themes) matches plain substrings so inflected
//! forms count: `"snug"` matches `"snugly"`, `"color"` matches `"colors"`.
//! Sustainability signals match on word boundaries instead, since short
//! country codes like `"uk"` would otherwise hit `"ukraine"`.

/// Whether any of `keywords` occurs anywhere in `text`.
#[must_use]
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| !kw.is_empty() && text.contains(kw))
}

/// Positive and negative keyword hits in `text`, as `(positive, negative)`.
///
/// Negative phrases are masked out before positives are counted, so a
/// positive keyword sitting inside a negative one (`"comfortable"` in
/// `"uncomfortable"`, `"worth it"` in `"not worth it"`) only counts as
/// negative.
#[must_use]
pub fn sentiment_hits(text: &str, positive: &[&str], negative: &[&str]) -> (usize, usize) {
    let mut masked = text.to_owned();
    let mut negative_hits = 0;
    for kw in negative.iter().filter(|kw| !kw.is_empty()) {
        if masked.contains(kw) {
            negative_hits += 1;
            masked = masked.replace(kw, "|");
        }
    }
    let positive_hits = positive
        .iter()
        .filter(|kw| !kw.is_empty() && masked.contains(*kw))
        .count();
    (positive_hits, negative_hits)
}

/// Whether `keyword` occurs in `text` on word boundaries.
///
/// Multi-word phrases and keywords with punctuation (`"well-made"`,
/// `"1% for the planet"`) match as a unit.
#[must_use]
pub fn mentions(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    text.match_indices(keyword).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Whether any of `keywords` is mentioned in `text` on word boundaries.
#[must_use]
pub fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| mentions(text, kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_accepts_inflections() {
        assert!(contains_any("fits snugly around the waist", &["snug"]));
        assert!(contains_any("love the colors", &["color"]));
        assert!(contains_any("fun patterns overall", &["pattern"]));
        assert!(!contains_any("arrived on time", &["color", "snug"]));
        assert!(!contains_any("anything", &[]));
        assert!(!contains_any("anything", &[""]));
    }

    #[test]
    fn negative_phrase_masks_contained_positive() {
        let positive = ["comfortable", "worth it"];
        let negative = ["uncomfortable", "not worth"];
        assert_eq!(sentiment_hits("really uncomfortable", &positive, &negative), (0, 1));
        assert_eq!(sentiment_hits("not worth it at all", &positive, &negative), (0, 1));
        assert_eq!(
            sentiment_hits("uncomfortable at first, comfortable later", &positive, &negative),
            (1, 1)
        );
        assert_eq!(sentiment_hits("so comfortable, worth it", &positive, &negative), (2, 0));
    }

    #[test]
    fn respects_word_boundaries() {
        assert!(mentions("so comfortable!", "comfortable"));
        assert!(!mentions("really uncomfortable", "comfortable"));
        assert!(!mentions("made in ukraine", "uk"));
        assert!(mentions("made in the uk.", "uk"));
    }

    #[test]
    fn matches_phrases_and_punctuated_keywords() {
        assert!(mentions("it runs small, size up", "runs small"));
        assert!(mentions("a well-made jacket", "well-made"));
        assert!(mentions("member of 1% for the planet", "1% for the planet"));
    }

    #[test]
    fn later_occurrence_can_match() {
        assert!(mentions("made in ukraine and the uk", "uk"));
        assert!(mentions_any("organic cotton", &["hemp", "organic"]));
        assert!(!mentions_any("organic cotton", &[]));
    }
}
