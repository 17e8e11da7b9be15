//! Retailer detection, product-identifier extraction and URL validation.
//!
//! Product extraction only accepts URLs on a supported retailer that carry a
//! recognisable product identifier. Listing/search extraction accepts any
//! `http(s)` URL; unknown storefronts fall through to the generic adapter.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

static AMAZON_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:dp|gp/product|gp/aw/d|product-reviews)/([A-Z0-9]{10})(?:[/?#]|$)")
        .expect("valid amazon id regex")
});
static WALMART_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/ip/(?:[^/?#]+/)?(\d{5,})").expect("valid walmart id regex"));
static TARGET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/A-(\d{6,})").expect("valid target id regex"));
static EBAY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/itm/(?:[^/?#]+/)?(\d{9,})").expect("valid ebay id regex"));

/// Query-string keys that carry the search term across storefronts.
const SEARCH_QUERY_KEYS: &[&str] = &["k", "q", "query", "searchTerm", "_nkw", "st", "search"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("invalid URL \"{url}\": {reason}")]
    Unparseable { url: String, reason: String },

    #[error("unsupported retailer domain: {host}")]
    UnsupportedDomain { host: String },

    #[error("no product identifier found in {url}")]
    MissingProductId { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Amazon,
    Walmart,
    Target,
    Ebay,
}

impl Retailer {
    pub const ALL: [Retailer; 4] = [
        Retailer::Amazon,
        Retailer::Walmart,
        Retailer::Target,
        Retailer::Ebay,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Retailer::Amazon => "amazon",
            Retailer::Walmart => "walmart",
            Retailer::Target => "target",
            Retailer::Ebay => "ebay",
        }
    }

    /// Primary storefront domain.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            Retailer::Amazon => "amazon.com",
            Retailer::Walmart => "walmart.com",
            Retailer::Target => "target.com",
            Retailer::Ebay => "ebay.com",
        }
    }

    /// Detects the retailer from a hostname. Any host with the retailer's
    /// brand as a dot-separated label matches (`www.amazon.co.uk`,
    /// `m.ebay.com`).
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        let host = host.to_ascii_lowercase();
        let labels: Vec<&str> = host.split('.').collect();
        Self::ALL
            .into_iter()
            .find(|retailer| labels.contains(&retailer.slug()))
    }

    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        url.host_str().and_then(Self::from_host)
    }

    /// Extracts the retailer's item identifier (ASIN, Walmart item id,
    /// Target TCIN, eBay item number) from a product URL path.
    #[must_use]
    pub fn product_id(self, url: &str) -> Option<String> {
        let re: &Regex = match self {
            Retailer::Amazon => &AMAZON_ID,
            Retailer::Walmart => &WALMART_ID,
            Retailer::Target => &TARGET_ID,
            Retailer::Ebay => &EBAY_ID,
        };
        re.captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
    }

    /// Regex a URL must match to count as a product detail link on this
    /// retailer. Used to discard non-product hits from web-search results.
    #[must_use]
    pub fn product_link_pattern(self) -> &'static Regex {
        match self {
            Retailer::Amazon => &AMAZON_ID,
            Retailer::Walmart => &WALMART_ID,
            Retailer::Target => &TARGET_ID,
            Retailer::Ebay => &EBAY_ID,
        }
    }

    /// Dedicated reviews page for a product, when the retailer has one.
    #[must_use]
    pub fn reviews_url(self, product_id: &str) -> Option<String> {
        match self {
            Retailer::Amazon => Some(format!(
                "https://www.amazon.com/product-reviews/{product_id}"
            )),
            Retailer::Walmart => Some(format!(
                "https://www.walmart.com/reviews/product/{product_id}"
            )),
            Retailer::Ebay => Some(format!(
                "https://www.ebay.com/fdbk/mweb_profile?fdbkType=FeedbackReceivedAsSeller&item_id={product_id}"
            )),
            Retailer::Target => None,
        }
    }
}

impl std::fmt::Display for Retailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Domains accepted by product extraction, in display order.
#[must_use]
pub fn supported_domains() -> Vec<&'static str> {
    Retailer::ALL.into_iter().map(Retailer::domain).collect()
}

/// A validated product-page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTarget {
    pub url: Url,
    pub retailer: Retailer,
    pub product_id: String,
}

/// A validated search/listing URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTarget {
    pub url: Url,
    pub retailer: Option<Retailer>,
    /// Lowercased host without a leading `www.`.
    pub domain: String,
    pub query: Option<String>,
}

fn parse_http_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Unparseable {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::Unparseable {
            url: raw.to_owned(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    if url.host_str().is_none() {
        return Err(UrlError::Unparseable {
            url: raw.to_owned(),
            reason: "missing host".to_owned(),
        });
    }
    Ok(url)
}

/// Validates a product-page URL.
///
/// # Errors
///
/// - [`UrlError::Unparseable`] for malformed or non-http(s) input.
/// - [`UrlError::UnsupportedDomain`] when the host is not a supported retailer.
/// - [`UrlError::MissingProductId`] when no item identifier is present.
pub fn parse_product_url(raw: &str) -> Result<ProductTarget, UrlError> {
    let url = parse_http_url(raw)?;
    let host = url.host_str().unwrap_or_default().to_owned();
    let retailer = Retailer::from_host(&host).ok_or(UrlError::UnsupportedDomain { host })?;
    let product_id = retailer
        .product_id(url.as_str())
        .ok_or_else(|| UrlError::MissingProductId {
            url: url.to_string(),
        })?;
    Ok(ProductTarget {
        url,
        retailer,
        product_id,
    })
}

/// Validates a search or listing URL. Any storefront is accepted.
///
/// # Errors
///
/// Returns [`UrlError::Unparseable`] for malformed or non-http(s) input.
pub fn parse_listing_url(raw: &str) -> Result<ListingTarget, UrlError> {
    let url = parse_http_url(raw)?;
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let domain = host.strip_prefix("www.").unwrap_or(&host).to_owned();
    let query = url
        .query_pairs()
        .find(|(key, value)| SEARCH_QUERY_KEYS.contains(&key.as_ref()) && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_owned());
    Ok(ListingTarget {
        retailer: Retailer::from_host(&host),
        url,
        domain,
        query,
    })
}

/// Stable identity for a product URL, used to deduplicate result lists.
///
/// Retailer URLs collapse to `retailer:item-id` so tracking parameters and
/// slug variants of the same item compare equal. Anything else becomes the
/// lowercased host plus path with query and fragment dropped.
#[must_use]
pub fn normalized_product_key(raw: &str) -> String {
    let Ok(url) = Url::parse(raw.trim()) else {
        return raw.trim().to_ascii_lowercase();
    };
    if let Some(retailer) = Retailer::from_url(&url) {
        if let Some(id) = retailer.product_id(url.as_str()) {
            return format!("{}:{id}", retailer.slug());
        }
    }
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let path = url.path().trim_end_matches('/');
    format!("{host}{path}")
}

#[cfg(test)]
#[path = "retailer_test.rs"]
mod tests;
