//! Config file loading
//!
//! Relative bookmark and database paths are resolved against the directory
//! holding the config file, so a scan reads and writes the same files from
//! any working directory.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, resolves, and validates the configuration at `path`
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use bookmark_sift::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Result limit: {}", config.search.result_limit);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Loads a configuration along with the hash recorded on every scan run
///
/// The file is read once, so the hash always describes the exact text that
/// produced the returned config.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let config = parse_config(&content, base_dir)?;
    Ok((config, content_hash(&content)))
}

/// Parses configuration text, resolving relative paths against `base_dir`
pub fn parse_config(content: &str, base_dir: &Path) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;

    config.bookmarks.source_path = resolve_path(base_dir, &config.bookmarks.source_path);
    config.storage.database_path = resolve_path(base_dir, &config.storage.database_path);

    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 of the configuration text
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

fn resolve_path(base_dir: &Path, value: &str) -> String {
    let path = Path::new(value);
    if value.trim().is_empty() || path.is_absolute() || base_dir.as_os_str().is_empty() {
        return value.to_string();
    }

    base_dir.join(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const FULL_CONFIG: &str = r#"
[bookmarks]
source-path = "./Bookmarks"

[scan]
concurrency = 4
checkpoint-interval = 5
initial-delay-ms = 0
timeout-ms = 2000

[search]
result-limit = 50

[user-agent]
name = "TestSift"
version = "1.0"
contact-url = "https://example.com/about"

[storage]
database-path = "/var/lib/sift/test.db"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL_CONFIG, Path::new("")).unwrap();

        assert_eq!(config.bookmarks.source_path, "./Bookmarks");
        assert_eq!(config.scan.concurrency, 4);
        assert_eq!(config.scan.checkpoint_interval, 5);
        assert_eq!(config.scan.initial_delay_ms, 0);
        assert_eq!(config.search.result_limit, 50);
        assert_eq!(config.user_agent.name, "TestSift");
        assert_eq!(config.storage.database_path, "/var/lib/sift/test.db");
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("[bookmarks]\nsource-path = \"./Bookmarks\"\n", Path::new(""))
            .unwrap();

        assert_eq!(config.scan.concurrency, 8);
        assert_eq!(config.scan.checkpoint_interval, 10);
        assert_eq!(config.scan.initial_delay_ms, 5_000);
        assert_eq!(config.scan.timeout_ms, 15_000);
        assert_eq!(config.search.result_limit, 20);
        assert!(config.scan.pdf_viewer_url.starts_with("https://"));
    }

    #[test]
    fn test_relative_paths_follow_config_dir() {
        let config = parse_config(FULL_CONFIG, Path::new("/etc/sift")).unwrap();

        // Relative paths move under the config dir, absolute ones stay put
        assert_eq!(
            PathBuf::from(&config.bookmarks.source_path),
            Path::new("/etc/sift").join("./Bookmarks")
        );
        assert_eq!(config.storage.database_path, "/var/lib/sift/test.db");
    }

    #[test]
    fn test_blank_source_path_still_rejected() {
        let result = parse_config("[bookmarks]\nsource-path = \"  \"\n", Path::new("/etc/sift"));
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_bookmarks_section() {
        let result = parse_config("[scan]\nconcurrency = 2\n", Path::new(""));
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let result = parse_config("this is not valid TOML {{{", Path::new(""));
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error() {
        let content = "[bookmarks]\nsource-path = \"./Bookmarks\"\n\n[scan]\nconcurrency = 0\n";
        let result = parse_config(content, Path::new(""));
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_with_hash_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sift.toml");
        std::fs::write(&path, FULL_CONFIG).unwrap();

        let (config, hash) = load_config_with_hash(&path).unwrap();

        assert_eq!(hash, content_hash(FULL_CONFIG));
        assert_eq!(hash.len(), 64);
        assert_eq!(
            PathBuf::from(&config.bookmarks.source_path),
            dir.path().join("./Bookmarks")
        );
        assert_eq!(
            load_config(&path).unwrap().bookmarks.source_path,
            config.bookmarks.source_path
        );
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_content_hash() {
        assert_eq!(content_hash("content 1"), content_hash("content 1"));
        assert_ne!(content_hash("content 1"), content_hash("content 2"));
    }
}
