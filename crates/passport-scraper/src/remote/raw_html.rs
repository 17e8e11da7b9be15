//! Raw-HTML tier: fetch the rendered search page and run the same search
//! adapter the live path uses over a [`StaticPage`].

use async_trait::async_trait;
use passport_core::VendorEndpoint;
use reqwest::Client;
use serde_json::json;

use super::{SearchQuery, SearchTier, TierOutcome};
use crate::adapters::search_adapter;
use crate::error::RemoteError;
use crate::page::StaticPage;

pub struct RawHtmlTier {
    client: Client,
    /// Unblocking proxy; when absent the page is fetched directly.
    unlocker: Option<VendorEndpoint>,
}

impl RawHtmlTier {
    #[must_use]
    pub fn new(client: Client, unlocker: Option<VendorEndpoint>) -> Self {
        Self { client, unlocker }
    }

    async fn fetch_html(&self, target: &str) -> Result<String, RemoteError> {
        let request = match &self.unlocker {
            Some(unlocker) => self
                .client
                .post(format!("{}/request", unlocker.base_url))
                .bearer_auth(&unlocker.api_key)
                .json(&json!({ "url": target, "format": "raw" })),
            None => self.client.get(target).header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            ),
        };
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::UnexpectedStatus {
                status: status.as_u16(),
                url: target.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SearchTier for RawHtmlTier {
    fn name(&self) -> &'static str {
        "raw_html"
    }

    async fn search(&self, query: &SearchQuery) -> Result<TierOutcome, RemoteError> {
        let html = self.fetch_html(&query.listing_url).await?;
        tracing::debug!(
            url = %query.listing_url,
            bytes = html.len(),
            via_unlocker = self.unlocker.is_some(),
            "fetched raw search html"
        );
        let page = StaticPage::new(query.listing_url.clone(), html);
        let items = search_adapter(query.retailer).extract_search(&page);
        Ok(TierOutcome::Items(items))
    }
}
