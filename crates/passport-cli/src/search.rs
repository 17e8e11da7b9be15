use std::time::Duration;

use passport_core::{parse_listing_url, AppConfig, ListingTarget};
use passport_scraper::{extract_listing, RemoteFetcher, SearchQuery, StaticPage};
use passport_synth::{enrich_items, CatalogItem};
use serde::Serialize;
use serde_json::Value;

use crate::extract::extract_options;

#[derive(Debug, Serialize)]
struct SearchOutput {
    query: Option<String>,
    domain: String,
    source: Option<&'static str>,
    items: Vec<CatalogItem>,
}

/// Runs the listing adapter over a saved page served at the target URL.
pub(crate) async fn search_saved(
    config: &AppConfig,
    target: &ListingTarget,
    html: String,
) -> anyhow::Result<Value> {
    let mut page = StaticPage::empty().with_route(target.url.as_str(), html);
    let items = extract_listing(&mut page, target, &extract_options(config)).await?;
    Ok(serde_json::to_value(SearchOutput {
        query: target.query.clone(),
        domain: target.domain.clone(),
        source: Some("saved_html"),
        items: enrich_items(items),
    })?)
}

async fn search_remote(config: &AppConfig, target: &ListingTarget) -> anyhow::Result<Value> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(config.navigation_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;
    let fetcher = RemoteFetcher::from_config(config, &client);
    let query = SearchQuery::from_listing(target);
    let hit = fetcher.fetch(&query).await;
    if hit.is_none() {
        tracing::warn!(tiers = ?fetcher.tier_names(), "every search tier came up empty");
    }
    let (source, items) = hit.map_or((None, Vec::new()), |hit| (Some(hit.tier), hit.items));
    Ok(serde_json::to_value(SearchOutput {
        query: query.keyword,
        domain: query.domain,
        source,
        items: enrich_items(items),
    })?)
}

/// Runs the `search` command.
///
/// # Errors
///
/// Returns an error for a malformed URL or when the saved page cannot be
/// parsed.
pub(crate) async fn run_search(
    config: &AppConfig,
    url: &str,
    html: Option<String>,
) -> anyhow::Result<Value> {
    let target = parse_listing_url(url)?;
    match html {
        Some(html) => search_saved(config, &target, html).await,
        None => search_remote(config, &target).await,
    }
}
