//! Configuration module for Bookmark-Sift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use bookmark_sift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Scanning with {} concurrent acquisitions", config.scan.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BookmarksConfig, Config, ScanConfig, SearchConfig, StorageConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{content_hash, load_config, load_config_with_hash, parse_config};
