use serde::Deserialize;

/// Main configuration structure for Bookmark-Sift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bookmarks: BookmarksConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the live bookmark tree is read from
#[derive(Debug, Clone, Deserialize)]
pub struct BookmarksConfig {
    /// Path to a Chromium `Bookmarks` file or a JSON array of bookmark nodes
    #[serde(rename = "source-path")]
    pub source_path: String,
}

/// Scan behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of acquisitions in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Number of completed acquisitions between corpus checkpoints
    #[serde(rename = "checkpoint-interval", default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,

    /// Grace period after opening a page before the timeout is armed (milliseconds)
    #[serde(rename = "initial-delay-ms", default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Hard timeout for capturing a page (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Prefix used to route PDF documents through an external viewer
    #[serde(rename = "pdf-viewer-url", default = "default_pdf_viewer_url")]
    pub pdf_viewer_url: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            checkpoint_interval: default_checkpoint_interval(),
            initial_delay_ms: default_initial_delay_ms(),
            timeout_ms: default_timeout_ms(),
            pdf_viewer_url: default_pdf_viewer_url(),
        }
    }
}

/// Search behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results returned per query
    #[serde(rename = "result-limit", default = "default_result_limit")]
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version of the client
    #[serde(default = "default_agent_version")]
    pub version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
            contact_url: default_contact_url(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!("{}/{} (+{})", self.name, self.version, self.contact_url)
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_concurrency() -> usize {
    8
}

fn default_checkpoint_interval() -> usize {
    10
}

fn default_initial_delay_ms() -> u64 {
    5_000
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_pdf_viewer_url() -> String {
    "https://drive.google.com/viewerng/viewer?url=".to_string()
}

fn default_result_limit() -> usize {
    20
}

fn default_agent_name() -> String {
    "bookmark-sift".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://github.com/bookmark-sift/bookmark-sift".to_string()
}

fn default_database_path() -> String {
    "./bookmark-sift.db".to_string()
}
