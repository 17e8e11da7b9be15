use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{LoadedDocument, PageHandle};
use crate::error::PageError;

/// Page backed by HTML strings already in memory.
///
/// Navigation resolves against a route table, so saved pages (and test
/// fixtures) can emulate "go to the dedicated reviews URL" without a network.
#[derive(Debug, Default)]
pub struct StaticPage {
    current: Option<LoadedDocument>,
    routes: HashMap<String, String>,
}

impl StaticPage {
    /// A page already positioned at `url` with `html` loaded.
    #[must_use]
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            current: Some(LoadedDocument::new(url, html)),
            routes: HashMap::new(),
        }
    }

    /// A page with nothing loaded; the first `goto_url` must hit a route.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers `html` as the document served for `url`.
    #[must_use]
    pub fn with_route(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.routes.insert(url.into(), html.into());
        self
    }
}

#[async_trait]
impl PageHandle for StaticPage {
    fn document(&self) -> Result<&LoadedDocument, PageError> {
        self.current.as_ref().ok_or(PageError::NotLoaded)
    }

    async fn goto_url(&mut self, url: &str, _timeout: Duration) -> Result<(), PageError> {
        let html = self
            .routes
            .get(url)
            .cloned()
            .ok_or_else(|| PageError::Navigation {
                url: url.to_owned(),
                reason: "no static route registered".to_owned(),
            })?;
        self.current = Some(LoadedDocument::new(url, html));
        Ok(())
    }

    async fn wait_for(&self, _ms: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageExt;

    #[tokio::test]
    async fn goto_unknown_route_fails() {
        let mut page = StaticPage::empty();
        let result = page
            .goto_url("https://example.com/p/1", Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(PageError::Navigation { .. })));
        assert!(matches!(page.document(), Err(PageError::NotLoaded)));
    }

    #[tokio::test]
    async fn goto_route_replaces_document() {
        let mut page = StaticPage::new("https://example.com/a", "<h1>A</h1>")
            .with_route("https://example.com/b", "<h1>B</h1>");
        page.goto_url("https://example.com/b", Duration::from_secs(1))
            .await
            .expect("route registered");
        assert_eq!(page.url(), "https://example.com/b");
        let heading = page.query_selector("h1").unwrap().expect("heading");
        assert_eq!(heading.text(), "B");
    }

    #[test]
    fn evaluate_runs_closure_against_document() {
        let page = StaticPage::new("https://example.com", "<ul><li>a</li><li>b</li></ul>");
        let count = page
            .evaluate(|doc| {
                let li = scraper::Selector::parse("li").expect("valid selector");
                doc.select(&li).count()
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn document_is_parsed_once_per_navigation() {
        let page = StaticPage::new("https://example.com", "<ul><li>a</li><li>b</li></ul>");
        let doc = page.document().unwrap();
        let first = doc.with_parsed(|tree| std::ptr::from_ref(tree));
        assert_eq!(page.query_selector_all("li").unwrap().len(), 2);
        let second = doc.with_parsed(|tree| std::ptr::from_ref(tree));
        assert_eq!(first, second);
    }

    #[test]
    fn body_text_skips_script_content() {
        let page = StaticPage::new(
            "https://example.com",
            "<html><head><title>T</title></head><body><p>Price $5.00</p><script>var a='$9.99';</script></body></html>",
        );
        let body = page.document().unwrap().body_text();
        assert_eq!(body, "Price $5.00");
    }
}
