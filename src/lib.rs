//! Bookmark-Sift: a searchable local mirror of your bookmarks
//!
//! This crate keeps a full-text corpus of bookmarked pages in sync with the
//! live bookmark tree, fetching readable article text for new bookmarks and
//! serving ranked queries over titles and content.

pub mod config;
pub mod corpus;
pub mod output;
pub mod scan;
pub mod search;
pub mod service;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Bookmark-Sift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Bookmark source error: {0}")]
    Source(#[from] SourceError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid scan phase transition: {from} -> {to}")]
    InvalidTransition {
        from: state::ScanPhase,
        to: state::ScanPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while enumerating the bookmark tree
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read bookmark file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed bookmark data: {0}")]
    Malformed(String),
}

/// Errors raised by a page renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Request failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Render timed out for {url} after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Result type alias for Bookmark-Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use corpus::{BookmarkCorpus, BookmarkEntry, ScanManifest, ScoredEntry};
pub use search::SearchService;
pub use service::BookmarkService;
pub use state::{IndexStatus, ScanPhase};
