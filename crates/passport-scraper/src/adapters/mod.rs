//! Retailer adapters.
//!
//! Product adapters turn a loaded product page into a [`RawExtractedProduct`];
//! search adapters turn a listing page into at most [`MAX_SEARCH_ITEMS`]
//! [`SearchResultItem`]s. The four supported retailers are pure selector data
//! ([`ProductProfile`], [`SearchProfile`]) run through shared control flow;
//! any other storefront goes through [`generic::GenericSearchAdapter`].
//!
//! Only navigation may fail an extraction. Everything after it degrades
//! field-by-field.

pub mod amazon;
pub mod ebay;
pub mod generic;
mod product;
mod reviews;
mod search;
pub mod target;
pub mod walmart;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use passport_core::{
    normalized_product_key, ListingTarget, ProductTarget, RawExtractedProduct, Retailer,
    SearchResultItem, MAX_SEARCH_ITEMS,
};

use crate::error::ExtractionError;
use crate::page::PageHandle;

pub use product::{ProductProfile, ReviewProfile};
pub use search::SearchProfile;

/// Timing knobs for one extraction session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Hard limit on each navigation.
    pub navigation_timeout: Duration,
    /// Fixed settle delay after navigation or scrolling.
    pub settle_delay_ms: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            settle_delay_ms: 1500,
        }
    }
}

#[async_trait]
pub trait ProductAdapter: Send + Sync {
    fn retailer(&self) -> Retailer;

    /// Extracts every field it can from the page's current document.
    ///
    /// Never fails: missing or broken fields come back absent. The page may
    /// be navigated away (to a dedicated reviews page) while doing so.
    async fn extract(
        &self,
        page: &mut dyn PageHandle,
        options: &ExtractOptions,
    ) -> RawExtractedProduct;
}

pub trait SearchAdapter: Send + Sync {
    /// Result cards on the page's current document, capped and de-duplicated.
    fn extract_search(&self, page: &dyn PageHandle) -> Vec<SearchResultItem>;
}

/// Product adapter for `retailer`.
#[must_use]
pub fn product_adapter(retailer: Retailer) -> &'static dyn ProductAdapter {
    match retailer {
        Retailer::Amazon => &amazon::PRODUCT,
        Retailer::Walmart => &walmart::PRODUCT,
        Retailer::Target => &target::PRODUCT,
        Retailer::Ebay => &ebay::PRODUCT,
    }
}

/// Search adapter for a listing page; unknown storefronts get the generic one.
#[must_use]
pub fn search_adapter(retailer: Option<Retailer>) -> &'static dyn SearchAdapter {
    match retailer {
        Some(Retailer::Amazon) => &amazon::SEARCH,
        Some(Retailer::Walmart) => &walmart::SEARCH,
        Some(Retailer::Target) => &target::SEARCH,
        Some(Retailer::Ebay) => &ebay::SEARCH,
        None => &generic::GenericSearchAdapter,
    }
}

/// De-duplicates by normalized product key (first occurrence wins) and caps
/// the list at [`MAX_SEARCH_ITEMS`].
#[must_use]
pub fn finalize_items(items: Vec<SearchResultItem>) -> Vec<SearchResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(normalized_product_key(&item.product_url)))
        .take(MAX_SEARCH_ITEMS)
        .collect()
}

/// Navigates to `url` and waits the settle delay once.
///
/// # Errors
///
/// Returns [`ExtractionError::Navigation`] on failure or timeout.
pub async fn navigate(
    page: &mut dyn PageHandle,
    url: &str,
    options: &ExtractOptions,
) -> Result<(), ExtractionError> {
    page.goto_url(url, options.navigation_timeout)
        .await
        .map_err(ExtractionError::Navigation)?;
    page.wait_for(options.settle_delay_ms).await;
    Ok(())
}

/// A product extraction plus, when asked for, the product page HTML as it
/// was first loaded.
#[derive(Debug)]
pub struct ProductCapture {
    pub product: RawExtractedProduct,
    pub landing_html: Option<String>,
}

/// Navigates to a validated product URL and runs its retailer's adapter,
/// keeping the landing HTML when `keep_html` is set.
///
/// # Errors
///
/// Returns [`ExtractionError::Navigation`] when the page cannot be loaded.
pub async fn capture_product(
    page: &mut dyn PageHandle,
    target: &ProductTarget,
    options: &ExtractOptions,
    keep_html: bool,
) -> Result<ProductCapture, ExtractionError> {
    navigate(page, target.url.as_str(), options).await?;
    // Taken before the adapter runs; review lookup may navigate away.
    let landing_html = if keep_html {
        page.document().ok().map(|doc| doc.html().to_owned())
    } else {
        None
    };
    let adapter = product_adapter(target.retailer);
    tracing::info!(retailer = %target.retailer, product_id = %target.product_id, "extracting product");
    let product = adapter.extract(page, options).await;
    Ok(ProductCapture {
        product,
        landing_html,
    })
}

/// [`capture_product`] without the landing HTML.
///
/// # Errors
///
/// Returns [`ExtractionError::Navigation`] when the page cannot be loaded.
pub async fn extract_product(
    page: &mut dyn PageHandle,
    target: &ProductTarget,
    options: &ExtractOptions,
) -> Result<RawExtractedProduct, ExtractionError> {
    Ok(capture_product(page, target, options, false).await?.product)
}

/// Navigates to a listing URL and runs the matching search adapter.
///
/// # Errors
///
/// Returns [`ExtractionError::Navigation`] when the page cannot be loaded.
pub async fn extract_listing(
    page: &mut dyn PageHandle,
    target: &ListingTarget,
    options: &ExtractOptions,
) -> Result<Vec<SearchResultItem>, ExtractionError> {
    navigate(page, target.url.as_str(), options).await?;
    let items = search_adapter(target.retailer).extract_search(page);
    tracing::info!(domain = %target.domain, items = items.len(), "extracted listing");
    Ok(items)
}
