use std::net::SocketAddr;
use std::path::PathBuf;

use crate::retailer::Retailer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Base URL plus bearer key for an HTTP collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct VendorEndpoint {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for VendorEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

/// Structured-scrape job API settings (first remote fetch tier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredScrapeConfig {
    pub endpoint: VendorEndpoint,
    /// Dataset identifier per retailer; retailers without one skip the tier.
    pub datasets: Vec<(Retailer, String)>,
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

impl StructuredScrapeConfig {
    #[must_use]
    pub fn dataset_for(&self, retailer: Retailer) -> Option<&str> {
        self.datasets
            .iter()
            .find(|(r, _)| *r == retailer)
            .map(|(_, id)| id.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub navigation_timeout_secs: u64,
    /// Fixed settle delay after navigation or scroll actions.
    pub settle_delay_ms: u64,
    pub user_agent: String,
    pub snapshot_dir: Option<PathBuf>,
    pub rate_limit_per_minute: usize,
    pub structured_scrape: Option<StructuredScrapeConfig>,
    pub unlocker: Option<VendorEndpoint>,
    pub web_search: Option<VendorEndpoint>,
}
