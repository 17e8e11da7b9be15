use super::*;

// -----------------------------------------------------------------------
// clean_text / truncate_excerpt
// -----------------------------------------------------------------------

#[test]
fn clean_text_collapses_whitespace() {
    assert_eq!(clean_text("  Organic \n\t Cotton  Tee "), "Organic Cotton Tee");
}

#[test]
fn truncate_excerpt_keeps_short_text() {
    assert_eq!(truncate_excerpt("Fits great", 100), "Fits great");
}

#[test]
fn truncate_excerpt_caps_length() {
    let long = "word ".repeat(60);
    let excerpt = truncate_excerpt(&long, 100);
    assert!(excerpt.chars().count() <= 100);
    assert!(excerpt.ends_with("..."));
}

#[test]
fn truncate_excerpt_counts_chars_not_bytes() {
    let text = "é".repeat(120);
    let excerpt = truncate_excerpt(&text, 100);
    assert_eq!(excerpt.chars().count(), 100);
}

// -----------------------------------------------------------------------
// parse_price
// -----------------------------------------------------------------------

#[test]
fn price_with_symbol_and_cents() {
    let price = parse_price("$24.99").expect("price");
    assert_eq!(price.text, "$24.99");
    assert!((price.value - 24.99).abs() < f64::EPSILON);
}

#[test]
fn price_pads_missing_cents() {
    assert_eq!(validate_price("Now $25").as_deref(), Some("$25.00"));
}

#[test]
fn price_strips_thousands_separator() {
    assert_eq!(validate_price("$1,299.5").as_deref(), Some("$1299.50"));
}

#[test]
fn price_keeps_vendor_symbol() {
    assert_eq!(validate_price("£12.00").as_deref(), Some("£12.00"));
}

#[test]
fn price_from_bare_attribute_value() {
    assert_eq!(validate_price("19.99").as_deref(), Some("$19.99"));
}

#[test]
fn price_skips_zero_and_finds_next_amount() {
    assert_eq!(
        validate_price("Shipping $0.00 Price $8.49").as_deref(),
        Some("$8.49")
    );
}

#[test]
fn price_rejects_text_without_amount() {
    assert_eq!(parse_price("See price in cart"), None);
    assert_eq!(parse_price("Ships in 3 days"), None);
}

#[test]
fn price_rejects_implausible_amount() {
    assert_eq!(parse_price("$250,000.00"), None);
}

// -----------------------------------------------------------------------
// parse_rating / validate_rating
// -----------------------------------------------------------------------

#[test]
fn rating_out_of_five() {
    assert_eq!(parse_rating("4.5 out of 5 stars"), Some(4.5));
    assert_eq!(
        validate_rating("4.5 out of 5 stars").as_deref(),
        Some("4.5 out of 5 stars")
    );
}

#[test]
fn rating_from_aria_label_phrase() {
    assert_eq!(
        validate_rating("Rated 3.8 out of 5 stars based on 120 reviews").as_deref(),
        Some("3.8 out of 5 stars")
    );
}

#[test]
fn rating_bare_number() {
    assert_eq!(parse_rating("4.2"), Some(4.2));
    assert_eq!(validate_rating("4").as_deref(), Some("4 out of 5 stars"));
}

#[test]
fn rating_rejects_out_of_range() {
    assert_eq!(parse_rating("7.5"), None);
    assert_eq!(parse_rating("10 of 50"), None);
}

#[test]
fn rating_rejects_unrelated_text() {
    assert_eq!(parse_rating("Best seller in Tees"), None);
}

// -----------------------------------------------------------------------
// review counts
// -----------------------------------------------------------------------

#[test]
fn review_count_preserves_k_suffix() {
    assert_eq!(parse_review_count("109.1K").as_deref(), Some("(109.1K)"));
}

#[test]
fn review_count_strips_commas() {
    assert_eq!(parse_review_count("1,234").as_deref(), Some("(1234)"));
    assert_eq!(parse_review_count("1,234 ratings").as_deref(), Some("(1234)"));
}

#[test]
fn review_count_uppercases_suffix() {
    assert_eq!(parse_review_count("(2.3k)").as_deref(), Some("(2.3K)"));
    assert_eq!(parse_review_count("1m reviews").as_deref(), Some("(1M)"));
}

#[test]
fn review_count_empty_is_none() {
    assert_eq!(parse_review_count(""), None);
    assert_eq!(parse_review_count("no reviews yet"), None);
}

#[test]
fn review_count_does_not_take_word_starting_with_m() {
    assert_eq!(parse_review_count("5 more").as_deref(), Some("(5)"));
}

#[test]
fn review_count_value_expands_suffix() {
    assert_eq!(review_count_value("(109.1K)"), Some(109_100));
    assert_eq!(review_count_value("(2M)"), Some(2_000_000));
    assert_eq!(review_count_value("(1234)"), Some(1234));
}

#[test]
fn format_review_count_groups_thousands() {
    assert_eq!(format_review_count("(109.1K)").as_deref(), Some("109,100"));
    assert_eq!(format_review_count("(999)").as_deref(), Some("999"));
    assert_eq!(format_review_count("(1234567)").as_deref(), Some("1,234,567"));
}
