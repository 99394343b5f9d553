use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("unsupported product page: {0}")]
    Extract(#[from] ExtractError),
}

/// Why a retailer page did not yield a product identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("product data container not found")]
    MissingContainer,

    #[error("product data is not valid JSON: {0}")]
    InvalidProps(String),

    #[error("product name missing")]
    MissingName,

    #[error("product category missing")]
    MissingCategory,

    #[error("unsupported category \"{0}\"")]
    UnsupportedCategory(String),
}

/// Failure writing to or reading from a cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
