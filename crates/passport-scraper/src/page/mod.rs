//! Uniform access to a structured document, whether it was fetched live or
//! handed over as a static HTML string.
//!
//! Adapters are written once against [`PageHandle`]. Neither implementation
//! executes scripts, so every extraction strategy must cope with markup that
//! was never hydrated.
//!
//! Each document is parsed once, on first query, and the tree is kept behind
//! a lock. Queries return owned [`ElementHandle`] snapshots so no guard is
//! held across an `.await`.

mod element;
mod http_page;
mod static_page;

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use passport_core::text::clean_text;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::error::PageError;
use crate::jsonld;

pub use element::ElementHandle;
pub use http_page::HttpPage;
pub use static_page::StaticPage;

/// Elements whose text never reaches the reader.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Upper bound on matches materialized by one `query_selector_all`.
const MAX_QUERY_MATCHES: usize = 500;

/// A loaded document plus lazily computed whole-page views.
#[derive(Debug)]
pub struct LoadedDocument {
    url: String,
    html: String,
    parsed: OnceLock<Mutex<Html>>,
    body_text: OnceLock<String>,
    json_ld_products: OnceLock<Vec<Value>>,
}

impl LoadedDocument {
    #[must_use]
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            parsed: OnceLock::new(),
            body_text: OnceLock::new(),
            json_ld_products: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Runs `f` against the parsed tree, parsing on first use.
    pub fn with_parsed<T>(&self, f: impl FnOnce(&Html) -> T) -> T {
        let tree = self
            .parsed
            .get_or_init(|| Mutex::new(Html::parse_document(&self.html)));
        let doc = tree.lock().unwrap_or_else(PoisonError::into_inner);
        f(&doc)
    }

    /// Visible text of `<body>` (or the whole document when there is none),
    /// whitespace-collapsed.
    pub fn body_text(&self) -> &str {
        self.body_text.get_or_init(|| {
            self.with_parsed(|doc| {
                let body = Selector::parse("body").expect("valid body selector");
                let root = doc
                    .select(&body)
                    .next()
                    .unwrap_or_else(|| doc.root_element());
                visible_text(root)
            })
        })
    }

    /// Every schema.org `Product` node found in JSON-LD script blocks.
    pub fn json_ld_products(&self) -> &[Value] {
        self.json_ld_products
            .get_or_init(|| self.with_parsed(jsonld::collect_products))
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|e| PageError::Selector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

/// Whitespace-collapsed text of `element`, skipping script/style content.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| INVISIBLE_TAGS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    clean_text(&out)
}

pub(crate) fn select_handles(
    doc: &Html,
    selector: &str,
    limit: usize,
) -> Result<Vec<ElementHandle>, PageError> {
    let parsed = parse_selector(selector)?;
    Ok(doc
        .select(&parsed)
        .take(limit)
        .map(ElementHandle::from_element)
        .collect())
}

/// Capability set the adapters rely on.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// The currently loaded document.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotLoaded`] before the first successful navigation.
    fn document(&self) -> Result<&LoadedDocument, PageError>;

    /// Navigates to `url`, replacing the current document. Only this call may
    /// fail a whole extraction.
    async fn goto_url(&mut self, url: &str, timeout: Duration) -> Result<(), PageError>;

    /// Fixed settle delay; waited once, never retried.
    async fn wait_for(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    /// Brings `selector` into view so lazy content can load. Returns whether
    /// the anchor exists in the current document.
    async fn scroll_to(&mut self, selector: &str) -> Result<bool, PageError> {
        Ok(self.query_selector(selector)?.is_some())
    }

    /// URL of the current document, or an empty string before navigation.
    fn url(&self) -> &str {
        self.document().map(LoadedDocument::url).unwrap_or_default()
    }

    fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        let handles = self
            .document()?
            .with_parsed(|doc| select_handles(doc, selector, 1))?;
        Ok(handles.into_iter().next())
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        self.document()?
            .with_parsed(|doc| select_handles(doc, selector, MAX_QUERY_MATCHES))
    }

    fn get_attribute(&self, handle: &ElementHandle, name: &str) -> Option<String> {
        handle.attr(name).map(str::to_owned)
    }

    fn text_content(&self, handle: &ElementHandle) -> String {
        handle.text().to_owned()
    }
}

/// Closure evaluation against the full parsed document.
pub trait PageExt: PageHandle {
    /// Runs `f` against the current document's parsed tree and returns its
    /// (owned) result.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotLoaded`] before the first navigation.
    fn evaluate<T>(&self, f: impl FnOnce(&Html) -> T) -> Result<T, PageError> {
        Ok(self.document()?.with_parsed(f))
    }
}

impl<P: PageHandle + ?Sized> PageExt for P {}

/// Anything a selector ladder can run against: a whole page or one element.
pub trait Scope {
    fn select_first(&self, selector: &str) -> Result<Option<ElementHandle>, PageError>;

    fn select_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError>;

    /// Visible text of the scope.
    fn scope_text(&self) -> Result<String, PageError>;

    /// `<meta>` content by `name` or `property`. Element scopes have none.
    fn meta_content(&self, key: &str) -> Result<Option<String>, PageError>;

    /// JSON-LD product nodes. Element scopes have none.
    fn json_ld_products(&self) -> Result<Vec<Value>, PageError>;
}

impl<P: PageHandle + ?Sized> Scope for P {
    fn select_first(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        self.query_selector(selector)
    }

    fn select_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        self.query_selector_all(selector)
    }

    fn scope_text(&self) -> Result<String, PageError> {
        Ok(self.document()?.body_text().to_owned())
    }

    fn meta_content(&self, key: &str) -> Result<Option<String>, PageError> {
        let selector = format!("meta[property='{key}'], meta[name='{key}']");
        Ok(self
            .query_selector_all(&selector)?
            .into_iter()
            .filter_map(|meta| meta.attr("content").map(clean_text))
            .find(|content| !content.is_empty()))
    }

    fn json_ld_products(&self) -> Result<Vec<Value>, PageError> {
        Ok(self.document()?.json_ld_products().to_vec())
    }
}

impl Scope for ElementHandle {
    fn select_first(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        self.query_selector(selector)
    }

    fn select_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        self.query_selector_all(selector)
    }

    fn scope_text(&self) -> Result<String, PageError> {
        Ok(self.text().to_owned())
    }

    fn meta_content(&self, _key: &str) -> Result<Option<String>, PageError> {
        Ok(None)
    }

    fn json_ld_products(&self) -> Result<Vec<Value>, PageError> {
        Ok(Vec::new())
    }
}
