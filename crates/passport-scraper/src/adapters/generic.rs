//! Heuristic search adapter for storefronts without a selector profile.
//!
//! Candidate products are links whose URL path looks like a product detail
//! page. Each link is widened to its nearest card ancestor (list item,
//! article, or an element whose class names a card/product/item/tile) with a
//! bounded walk, then name, price, image and rating are read from that card.
//! A page with no candidate links is treated as a single product page.

use std::collections::HashSet;
use std::sync::LazyLock;

use passport_core::SearchResultItem;
use passport_core::text::{parse_price, parse_rating, parse_review_count};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::product::absolute_url;
use super::{finalize_items, SearchAdapter};
use crate::error::PageError;
use crate::ladder::{image_reference, plausible_name};
use crate::page::{visible_text, PageExt, PageHandle};

/// URL path shapes of product detail pages across common storefront
/// platforms.
static PRODUCT_PATH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"/dp/[A-Z0-9]{10}",
        r"/ip/(?:[^/]+/)?\d{5,}",
        r"/A-\d{6,}",
        r"/itm/(?:[^/]+/)?\d{9,}",
        r"/products?/[^/?#]+",
        r"/p/[^/?#]+",
        r"/pd/[^/?#]+",
        r"/listing/\d+",
        r"/item/\d+",
        r"-p-\d+",
        r"/[^/]+-\d{6,}\.html",
        r"/shop/[^/?#]+/[^/?#]+-\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid product path regex"))
    .collect()
});

static CARD_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)card|product|item|tile|result").expect("valid card class regex")
});

static RATING_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d(?:\.\d+)?\s*(?:out of 5|/\s*5|stars?)\b").expect("valid rating text regex")
});

static REVIEW_COUNT_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(?([\d,.]+[KkMm]?)\)?\s*(?:reviews|ratings)\b")
        .expect("valid review count text regex")
});

static SELECTORS: LazyLock<GenericSelectors> = LazyLock::new(GenericSelectors::new);

/// Ancestor hops allowed when widening a link to its card.
const MAX_CARD_DEPTH: usize = 6;

/// Image URL fragments that mark non-product imagery.
const NON_PRODUCT_IMAGE_HINTS: &[&str] = &["logo", "icon", "sprite", "banner", "avatar", "badge"];

struct GenericSelectors {
    link: Selector,
    heading: Selector,
    titled: Selector,
    image: Selector,
    rated: Selector,
    page_heading: Selector,
    og_title: Selector,
    og_image: Selector,
    title: Selector,
    body: Selector,
}

impl GenericSelectors {
    fn new() -> Self {
        let parse = |s: &str| Selector::parse(s).expect("valid generic selector");
        Self {
            link: parse("a[href]"),
            heading: parse("h2, h3, h4"),
            titled: parse("[class*='title'], [class*='name'], [class*='Title'], [class*='Name']"),
            image: parse("img"),
            rated: parse("[aria-label*='out of 5'], [aria-label*='stars'], [title*='out of 5']"),
            page_heading: parse("h1"),
            og_title: parse("meta[property='og:title']"),
            og_image: parse("meta[property='og:image']"),
            title: parse("title"),
            body: parse("body"),
        }
    }
}

/// Whether `url`'s path looks like a product detail page.
#[must_use]
pub fn looks_like_product_url(url: &str) -> bool {
    let path = url::Url::parse(url).map_or_else(|_| url.to_owned(), |u| u.path().to_owned());
    PRODUCT_PATH_PATTERNS.iter().any(|re| re.is_match(&path))
}

fn is_card(element: ElementRef<'_>) -> bool {
    let value = element.value();
    matches!(value.name(), "li" | "article")
        || value.attr("class").is_some_and(|c| CARD_CLASS.is_match(c))
}

/// Nearest card ancestor of `link` within [`MAX_CARD_DEPTH`] hops, or the
/// link itself.
fn closest_card(link: ElementRef<'_>) -> ElementRef<'_> {
    link.ancestors()
        .take(MAX_CARD_DEPTH)
        .filter_map(ElementRef::wrap)
        .find(|el| is_card(*el))
        .unwrap_or(link)
}

fn image_src(img: ElementRef<'_>) -> Option<String> {
    let value = img.value();
    ["src", "data-src", "data-lazy-src", "data-original"]
        .iter()
        .filter_map(|attr| value.attr(attr))
        .find_map(image_reference)
        .filter(|src| {
            let lower = src.to_ascii_lowercase();
            !NON_PRODUCT_IMAGE_HINTS.iter().any(|hint| lower.contains(hint))
        })
}

fn first_price(text: &str) -> Option<(String, f64)> {
    parse_price(text).map(|p| (p.text, p.value))
}

fn card_name(card: ElementRef<'_>, link: ElementRef<'_>, sel: &GenericSelectors) -> Option<String> {
    let link_title = link.value().attr("title").and_then(plausible_name);
    let heading = card.select(&sel.heading).map(visible_text).find_map(|t| plausible_name(&t));
    let titled = card.select(&sel.titled).map(visible_text).find_map(|t| plausible_name(&t));
    let link_text = plausible_name(&visible_text(link));
    let img_alt = card
        .select(&sel.image)
        .filter_map(|img| img.value().attr("alt"))
        .find_map(plausible_name);

    [link_title, heading, titled, link_text, img_alt]
        .into_iter()
        .flatten()
        .find(|name| name.chars().count() >= 3 && parse_price(name).is_none())
}

fn card_rating(card: ElementRef<'_>, text: &str, sel: &GenericSelectors) -> Option<f32> {
    card.select(&sel.rated)
        .filter_map(|el| el.value().attr("aria-label").or_else(|| el.value().attr("title")))
        .find_map(parse_rating)
        .or_else(|| RATING_TEXT.find(text).and_then(|m| parse_rating(m.as_str())))
}

fn card_item(
    card: ElementRef<'_>,
    link: ElementRef<'_>,
    url: String,
    page_url: &str,
    sel: &GenericSelectors,
) -> Option<SearchResultItem> {
    let name = card_name(card, link, sel)?;
    let text = visible_text(card);
    let mut item = SearchResultItem::new(name, url);
    if let Some((price, value)) = first_price(&text) {
        item.price = Some(price);
        item.price_value = Some(value);
    }
    if let Some(rating) = card_rating(card, &text, sel) {
        item.rating = Some(format!("{rating} out of 5 stars"));
        item.rating_value = Some(rating);
    }
    item.review_count = REVIEW_COUNT_TEXT
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_review_count(m.as_str()));
    item.image_url = card
        .select(&sel.image)
        .find_map(image_src)
        .and_then(|src| absolute_url(page_url, &src));
    Some(item)
}

fn scan_cards(doc: &Html, page_url: &str) -> Vec<SearchResultItem> {
    let sel = &*SELECTORS;
    let mut seen_cards = HashSet::new();
    let mut items = Vec::new();

    for link in doc.select(&sel.link) {
        let Some(url) = link
            .value()
            .attr("href")
            .and_then(|href| absolute_url(page_url, href))
            .filter(|url| looks_like_product_url(url))
        else {
            continue;
        };
        let card = closest_card(link);
        if !seen_cards.insert(card.id()) {
            continue;
        }
        if let Some(item) = card_item(card, link, url, page_url, sel) {
            items.push(item);
        }
    }
    items
}

/// Whole-page fallback: heading, first price-like token, first
/// product-looking image.
fn single_product(doc: &Html, page_url: &str) -> Option<SearchResultItem> {
    let sel = &*SELECTORS;
    let name = doc
        .select(&sel.page_heading)
        .map(visible_text)
        .find_map(|t| plausible_name(&t))
        .or_else(|| {
            doc.select(&sel.og_title)
                .filter_map(|m| m.value().attr("content"))
                .find_map(plausible_name)
        })
        .or_else(|| {
            doc.select(&sel.title)
                .map(visible_text)
                .find_map(|t| plausible_name(&t))
        })?;

    let body_text = doc
        .select(&sel.body)
        .next()
        .map_or_else(|| visible_text(doc.root_element()), visible_text);
    let mut item = SearchResultItem::new(name, page_url);
    if let Some((price, value)) = first_price(&body_text) {
        item.price = Some(price);
        item.price_value = Some(value);
    }
    item.image_url = doc
        .select(&sel.og_image)
        .filter_map(|m| m.value().attr("content"))
        .find_map(image_reference)
        .or_else(|| doc.select(&sel.image).find_map(image_src))
        .and_then(|src| absolute_url(page_url, &src));
    Some(item)
}

fn scan_page(page: &dyn PageHandle) -> Result<Vec<SearchResultItem>, PageError> {
    let page_url = page.url().to_owned();
    page.evaluate(|doc| {
        let items = scan_cards(doc, &page_url);
        if items.is_empty() {
            tracing::debug!(url = %page_url, "no product links; treating page as one product");
            single_product(doc, &page_url).into_iter().collect()
        } else {
            items
        }
    })
}

/// Search adapter for any storefront.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericSearchAdapter;

impl SearchAdapter for GenericSearchAdapter {
    fn extract_search(&self, page: &dyn PageHandle) -> Vec<SearchResultItem> {
        match scan_page(page) {
            Ok(items) => finalize_items(items),
            Err(e) => {
                tracing::warn!(url = page.url(), error = %e, "generic listing scan failed");
                Vec::new()
            }
        }
    }
}
