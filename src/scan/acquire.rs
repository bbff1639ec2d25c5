//! Content acquisition for a single bookmark
//!
//! Renders the page, routes PDFs through the configured viewer, extracts the
//! readable article and sanitizes it. Every failure is contained here: the
//! caller only ever sees an entry or nothing.

use crate::config::ScanConfig;
use crate::corpus::BookmarkEntry;
use crate::scan::extract::extract_article;
use crate::scan::render::{render_page, Capture, Renderer};
use crate::scan::sanitize::sanitize_content;
use crate::RenderError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Turns bookmark URLs into corpus entries
#[derive(Clone)]
pub struct ContentAcquirer {
    renderer: Arc<dyn Renderer>,
    initial_delay: Duration,
    timeout: Duration,
    pdf_viewer_url: String,
}

impl ContentAcquirer {
    /// Creates an acquirer using the scan timing and PDF viewer settings
    pub fn new(renderer: Arc<dyn Renderer>, config: &ScanConfig) -> Self {
        Self {
            renderer,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            timeout: Duration::from_millis(config.timeout_ms),
            pdf_viewer_url: config.pdf_viewer_url.clone(),
        }
    }

    /// Acquires the readable content of `url`
    ///
    /// Returns `None` when the URL is not fetchable, the render fails or
    /// times out, or no article text can be extracted. The URL will simply
    /// be tried again on the next scan.
    pub async fn acquire(&self, url: &str) -> Option<BookmarkEntry> {
        if !is_fetchable(url) {
            tracing::debug!("Skipping non-fetchable bookmark {}", url);
            return None;
        }

        tracing::debug!("Processing {}", url);

        let (rendered_title, markup) = match self.capture_document(url).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::warn!("No renderable document for {}", url);
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to render {}: {}", url, e);
                return None;
            }
        };

        let Some(article) = extract_article(&markup) else {
            tracing::warn!("No readable article text in {}", url);
            return None;
        };

        let content = sanitize_content(&article.content);
        if content.is_empty() {
            return None;
        }

        let title = rendered_title
            .filter(|title| !title.trim().is_empty())
            .or(article.document_title)
            .or(article.title)
            .unwrap_or_default();

        Some(BookmarkEntry {
            url: url.to_string(),
            title: sanitize_content(&title),
            content,
        })
    }

    /// Renders `url`, retrying once through the PDF viewer when needed
    async fn capture_document(
        &self,
        url: &str,
    ) -> Result<Option<(Option<String>, String)>, RenderError> {
        match self.render(url).await? {
            Capture::Document { title, markup } => Ok(Some((title, markup))),
            Capture::Pdf => {
                let viewer_url = pdf_viewer_url(&self.pdf_viewer_url, url);
                tracing::debug!("{} is a PDF, retrying through {}", url, viewer_url);

                match self.render(&viewer_url).await? {
                    Capture::Document { title, markup } => Ok(Some((title, markup))),
                    Capture::Pdf => Ok(None),
                }
            }
        }
    }

    async fn render(&self, url: &str) -> Result<Capture, RenderError> {
        render_page(self.renderer.as_ref(), url, self.initial_delay, self.timeout).await
    }
}

/// Returns true for absolute http(s) URLs
///
/// Bookmarklets (`javascript:`) and other pseudo-schemes cannot be rendered.
pub fn is_fetchable(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.scheme() == "http" || parsed.scheme() == "https",
        Err(_) => false,
    }
}

/// Builds the viewer-proxy URL for a PDF document
pub fn pdf_viewer_url(prefix: &str, url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
    format!("{}{}", prefix, encoded)
}
