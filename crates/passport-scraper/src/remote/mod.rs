//! Multi-tier remote fetch for search/catalog queries.
//!
//! Tiers run strictly in sequence. A tier that errors, reports its job as
//! still pending, or returns an empty list hands over to the next one; the
//! first non-empty list is returned as-is. There is no concurrency between
//! tiers.

mod raw_html;
mod structured;
mod web_search;

use async_trait::async_trait;
use passport_core::{AppConfig, ListingTarget, Retailer, SearchResultItem};
use reqwest::Client;

use crate::error::RemoteError;

pub use raw_html::RawHtmlTier;
pub use structured::StructuredScrapeTier;
pub use web_search::WebSearchTier;

/// One search request as seen by every tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub retailer: Option<Retailer>,
    /// Lowercased host without `www.`.
    pub domain: String,
    /// Search keyword, when the listing URL carries one.
    pub keyword: Option<String>,
    /// The rendered search/listing page.
    pub listing_url: String,
}

impl SearchQuery {
    #[must_use]
    pub fn from_listing(target: &ListingTarget) -> Self {
        Self {
            retailer: target.retailer,
            domain: target.domain.clone(),
            keyword: target.query.clone(),
            listing_url: target.url.to_string(),
        }
    }
}

/// Result of one tier attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    Items(Vec<SearchResultItem>),
    /// The data source accepted the job but has no results yet.
    Pending,
}

#[async_trait]
pub trait SearchTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &SearchQuery) -> Result<TierOutcome, RemoteError>;
}

/// Items plus the tier that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct TierHit {
    pub tier: &'static str,
    pub items: Vec<SearchResultItem>,
}

/// Ordered tier escalation.
pub struct RemoteFetcher {
    tiers: Vec<Box<dyn SearchTier>>,
}

impl RemoteFetcher {
    #[must_use]
    pub fn new(tiers: Vec<Box<dyn SearchTier>>) -> Self {
        Self { tiers }
    }

    /// Standard tier order: structured scrape (when configured), raw HTML
    /// (always), web search (when configured).
    #[must_use]
    pub fn from_config(config: &AppConfig, client: &Client) -> Self {
        let mut tiers: Vec<Box<dyn SearchTier>> = Vec::new();
        if let Some(scrape) = &config.structured_scrape {
            tiers.push(Box::new(StructuredScrapeTier::new(
                client.clone(),
                scrape.clone(),
            )));
        }
        tiers.push(Box::new(RawHtmlTier::new(
            client.clone(),
            config.unlocker.clone(),
        )));
        if let Some(search) = &config.web_search {
            tiers.push(Box::new(WebSearchTier::new(client.clone(), search.clone())));
        }
        Self::new(tiers)
    }

    #[must_use]
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|tier| tier.name()).collect()
    }

    /// Tries each tier in order and returns the first non-empty result, or
    /// `None` when every tier came back empty, pending or failed.
    pub async fn fetch(&self, query: &SearchQuery) -> Option<TierHit> {
        for tier in &self.tiers {
            match tier.search(query).await {
                Ok(TierOutcome::Items(items)) if !items.is_empty() => {
                    tracing::info!(
                        tier = tier.name(),
                        domain = %query.domain,
                        items = items.len(),
                        "search tier returned results"
                    );
                    return Some(TierHit {
                        tier: tier.name(),
                        items,
                    });
                }
                Ok(TierOutcome::Items(_)) => {
                    tracing::debug!(tier = tier.name(), "search tier returned no items; escalating");
                }
                Ok(TierOutcome::Pending) => {
                    tracing::debug!(tier = tier.name(), "search tier still pending; escalating");
                }
                Err(e) => {
                    tracing::warn!(tier = tier.name(), error = %e, "search tier failed; escalating");
                }
            }
        }
        None
    }
}

/// Checks the status and reads the body of a tier response as JSON.
pub(crate) async fn read_json(
    response: reqwest::Response,
    context: &str,
) -> Result<serde_json::Value, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| RemoteError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
