//! Page access, retailer adapters and remote search tiers.

pub mod adapters;
pub mod error;
pub mod jsonld;
pub mod ladder;
pub mod page;
pub mod remote;
pub mod signals;

pub use adapters::{
    capture_product, extract_listing, extract_product, finalize_items, navigate, product_adapter,
    search_adapter, ExtractOptions, ProductAdapter, ProductCapture, SearchAdapter,
};
pub use error::{ExtractionError, PageError, RemoteError};
pub use page::{ElementHandle, HttpPage, LoadedDocument, PageExt, PageHandle, Scope, StaticPage};
pub use passport_core::text::{
    clean_text, format_review_count, parse_price, parse_rating, parse_review_count,
    review_count_value, truncate_excerpt, ParsedPrice,
};
pub use remote::{
    RawHtmlTier, RemoteFetcher, SearchQuery, SearchTier, StructuredScrapeTier, TierHit,
    TierOutcome, WebSearchTier,
};
