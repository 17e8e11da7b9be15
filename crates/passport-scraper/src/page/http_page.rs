use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{LoadedDocument, PageHandle};
use crate::error::PageError;

/// Live page that navigates over HTTP.
///
/// The server-rendered HTML is the document; client-side scripts never run.
/// `scroll_to` is therefore an existence check and lazy-loaded sections only
/// appear if the storefront renders them server-side.
#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    current: Option<LoadedDocument>,
}

impl HttpPage {
    /// Builds a page session with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Http`] if the client cannot be constructed.
    pub fn new(user_agent: &str) -> Result<Self, PageError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing client (shared connection pool).
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, PageError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Navigation {
                url: url.to_owned(),
                reason: format!("HTTP status {}", status.as_u16()),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageHandle for HttpPage {
    fn document(&self) -> Result<&LoadedDocument, PageError> {
        self.current.as_ref().ok_or(PageError::NotLoaded)
    }

    async fn goto_url(&mut self, url: &str, timeout: Duration) -> Result<(), PageError> {
        let html = tokio::time::timeout(timeout, self.fetch(url))
            .await
            .map_err(|_| PageError::Timeout {
                url: url.to_owned(),
                timeout_secs: timeout.as_secs(),
            })??;
        tracing::debug!(url, bytes = html.len(), "page loaded");
        self.current = Some(LoadedDocument::new(url, html));
        Ok(())
    }
}
