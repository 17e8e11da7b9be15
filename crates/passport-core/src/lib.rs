//! Shared domain model, retailer detection, configuration and storage
//! abstractions for the product passport service.

pub mod app_config;
pub mod config;
pub mod error;
pub mod products;
pub mod retailer;
pub mod store;
pub mod text;

pub use app_config::{AppConfig, Environment, StructuredScrapeConfig, VendorEndpoint};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use products::{
    CategoryScore, ExtractedReview, FitSummary, FitVerdict, Narration, ProductImages,
    ProductPassport, RawExtractedProduct, ReturnRisk, ReviewTheme, RiskLabel, SearchResultItem,
    Severity, SustainabilityCategories, SustainabilityInfo, SustainabilityRating,
    MAX_SEARCH_ITEMS, UNKNOWN_PRODUCT_NAME,
};
pub use retailer::{
    normalized_product_key, parse_listing_url, parse_product_url, supported_domains,
    ListingTarget, ProductTarget, Retailer, UrlError,
};
pub use store::{InMemoryStore, Store};
