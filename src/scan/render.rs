//! Page rendering capability
//!
//! This module defines the contract the acquisition step renders pages
//! through, and an HTTP implementation of it:
//! - A `Renderer` opens a `RenderSession` for a URL
//! - The session captures either serialized markup or a PDF marker
//! - `render_page` owns the grace delay, the hard timeout, and closes
//!   every opened session exactly once

use crate::config::UserAgentConfig;
use crate::RenderError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::task::JoinHandle;

/// What a render session captured from a loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// A text document
    Document {
        /// Title reported by the renderer, when it tracks one apart from
        /// the markup
        title: Option<String>,
        /// Serialized page markup
        markup: String,
    },

    /// The page is a PDF and has no markup to extract
    Pdf,
}

/// One opened page
#[async_trait]
pub trait RenderSession: Send {
    /// Captures the loaded page
    async fn capture(&mut self) -> Result<Capture, RenderError>;

    /// Releases the page's resources
    async fn close(self: Box<Self>);
}

/// Opens pages for capture
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Starts loading `url`
    async fn open(&self, url: &str) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// Renders a page with a grace delay and a hard timeout
///
/// The session is given `initial_delay` to load before the `timeout` is
/// armed around the capture. Whatever the outcome, an opened session is
/// closed exactly once before this returns.
pub async fn render_page(
    renderer: &dyn Renderer,
    url: &str,
    initial_delay: Duration,
    timeout: Duration,
) -> Result<Capture, RenderError> {
    let mut session = renderer.open(url).await?;

    if !initial_delay.is_zero() {
        tokio::time::sleep(initial_delay).await;
    }

    let outcome = match tokio::time::timeout(timeout, session.capture()).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    };

    session.close().await;
    outcome
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use bookmark_sift::config::UserAgentConfig;
/// use bookmark_sift::scan::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renders pages by fetching them over HTTP
///
/// No script runs, so the captured markup is what the server sent. Opening
/// a page starts the request in the background; the capture waits for it.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn open(&self, url: &str) -> Result<Box<dyn RenderSession>, RenderError> {
        let request = self.client.get(url);
        let loading = tokio::spawn(async move { request.send().await });

        Ok(Box::new(HttpSession {
            url: url.to_string(),
            loading: Some(loading),
        }))
    }
}

struct HttpSession {
    url: String,
    loading: Option<JoinHandle<Result<Response, reqwest::Error>>>,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn capture(&mut self) -> Result<Capture, RenderError> {
        let loading = self.loading.as_mut().ok_or_else(|| RenderError::Transport {
            url: self.url.clone(),
            message: "page was already captured".to_string(),
        })?;

        let joined = loading.await;
        self.loading = None;

        let response = joined
            .map_err(|e| RenderError::Transport {
                url: self.url.clone(),
                message: e.to_string(),
            })?
            .map_err(|e| classify_error(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.contains("application/pdf") {
            return Ok(Capture::Pdf);
        }

        let markup = response
            .text()
            .await
            .map_err(|e| classify_error(&self.url, e))?;

        // The title lives in the markup and is read during extraction
        Ok(Capture::Document {
            title: None,
            markup,
        })
    }

    async fn close(self: Box<Self>) {
        // A request still in flight is abandoned
        if let Some(loading) = &self.loading {
            loading.abort();
        }
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> RenderError {
    if error.is_timeout() {
        RenderError::Transport {
            url: url.to_string(),
            message: "request timeout".to_string(),
        }
    } else if error.is_connect() {
        RenderError::Transport {
            url: url.to_string(),
            message: "connection refused".to_string(),
        }
    } else {
        RenderError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
