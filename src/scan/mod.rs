//! Scan module for synchronizing the corpus with the bookmark tree
//!
//! This module contains the core scan logic, including:
//! - Page rendering with a grace delay and a hard timeout
//! - Readable article extraction and text sanitization
//! - The coordinator that diffs, removes, and acquires bookmarks

mod acquire;
mod coordinator;
mod extract;
mod progress;
mod render;
mod sanitize;

pub use acquire::{is_fetchable, pdf_viewer_url, ContentAcquirer};
pub use coordinator::{Coordinator, NoopObserver, ScanObserver};
pub use extract::{extract_article, ExtractedArticle};
pub use progress::ProgressTracker;
pub use render::{build_http_client, render_page, Capture, HttpRenderer, RenderSession, Renderer};
pub use sanitize::sanitize_content;
