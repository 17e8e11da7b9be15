//! Web-search tier: a `site:`-filtered results query, keeping only hits whose
//! URL has the shape of a product detail page.

use async_trait::async_trait;
use passport_core::text::{clean_text, parse_price, parse_rating, parse_review_count};
use passport_core::{SearchResultItem, VendorEndpoint};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{read_json, SearchQuery, SearchTier, TierOutcome};
use crate::adapters::finalize_items;
use crate::adapters::generic::looks_like_product_url;
use crate::error::RemoteError;

const RESULT_LISTS: &[&str] = &["organic", "organic_results", "results", "items"];
const RESULTS_PER_QUERY: u8 = 20;

pub struct WebSearchTier {
    client: Client,
    endpoint: VendorEndpoint,
}

impl WebSearchTier {
    #[must_use]
    pub fn new(client: Client, endpoint: VendorEndpoint) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl SearchTier for WebSearchTier {
    fn name(&self) -> &'static str {
        "web_search"
    }

    async fn search(&self, query: &SearchQuery) -> Result<TierOutcome, RemoteError> {
        let keyword = query
            .keyword
            .as_deref()
            .ok_or(RemoteError::NotConfigured("web_search"))?;
        let site_query = format!("site:{} {keyword}", query.domain);
        let url = format!(
            "{}/search?q={}&num={RESULTS_PER_QUERY}",
            self.endpoint.base_url,
            utf8_percent_encode(&site_query, NON_ALPHANUMERIC)
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.endpoint.api_key)
            .send()
            .await?;
        let body = read_json(response, &format!("web search for {site_query}")).await?;

        let hits = result_list(&body);
        let items: Vec<SearchResultItem> = hits
            .iter()
            .filter_map(|hit| hit_item(hit, query))
            .collect();
        tracing::debug!(
            query = %site_query,
            hits = hits.len(),
            kept = items.len(),
            "web search results filtered"
        );
        Ok(TierOutcome::Items(finalize_items(items)))
    }
}

fn result_list(body: &Value) -> &[Value] {
    RESULT_LISTS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .map_or(&[], Vec::as_slice)
}

fn text_field(hit: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match hit.get(*name)? {
        Value::String(s) => Some(clean_text(s)).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Whether `host` is `domain` itself or one of its subdomains.
fn on_domain(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    host == domain
        || host
            .strip_suffix(&domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Whether `link` is a product page on the queried storefront.
fn is_product_link(link: &str, query: &SearchQuery) -> bool {
    let Ok(url) = Url::parse(link) else {
        return false;
    };
    if !url.host_str().is_some_and(|host| on_domain(host, &query.domain)) {
        return false;
    }
    match query.retailer {
        Some(retailer) => retailer.product_link_pattern().is_match(link),
        None => looks_like_product_url(link),
    }
}

fn hit_item(hit: &Value, query: &SearchQuery) -> Option<SearchResultItem> {
    let link = text_field(hit, &["link", "url"])?;
    if !is_product_link(&link, query) {
        return None;
    }
    let title = text_field(hit, &["title", "name"])?;
    let mut item = SearchResultItem::new(title, link);

    let snippet = text_field(hit, &["snippet", "description"]).unwrap_or_default();
    let price = text_field(hit, &["price"])
        .and_then(|raw| parse_price(&raw))
        .or_else(|| parse_price(&snippet));
    if let Some(price) = price {
        item.price_value = Some(price.value);
        item.price = Some(price.text);
    }
    item.rating_value = text_field(hit, &["rating"]).and_then(|raw| parse_rating(&raw));
    item.rating = item.rating_value.map(|r| format!("{r} out of 5 stars"));
    item.review_count = text_field(hit, &["reviews", "ratingCount"])
        .and_then(|raw| parse_review_count(&raw));
    item.image_url = text_field(hit, &["imageUrl", "thumbnail", "image"]);
    Some(item)
}
