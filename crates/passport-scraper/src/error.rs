use passport_core::Retailer;
use thiserror::Error;

/// Failures of the page/document session.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("invalid selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },

    #[error("no document loaded")]
    NotLoaded,
}

/// Failures that abort a whole extraction request.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("page session could not be started: {0}")]
    Session(String),

    #[error("navigation failed: {0}")]
    Navigation(#[source] PageError),

    #[error("no adapter registered for {0}")]
    NoAdapter(Retailer),
}

/// Failures of a remote data-source tier.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("tier {0} is not configured for this request")]
    NotConfigured(&'static str),

    #[error("page error: {0}")]
    Page(#[from] PageError),
}
