//! HTTP renderer tests against a mock server

use bookmark_sift::config::UserAgentConfig;
use bookmark_sift::scan::{build_http_client, render_page, Capture, HttpRenderer};
use bookmark_sift::RenderError;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn renderer() -> HttpRenderer {
    let client = build_http_client(&UserAgentConfig::default()).expect("Failed to build client");
    HttpRenderer::new(client)
}

async fn render(url: &str, timeout: Duration) -> Result<Capture, RenderError> {
    render_page(&renderer(), url, Duration::ZERO, timeout).await
}

#[tokio::test]
async fn test_captures_html_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head><title> Page Title </title></head><body><p>Hello</p></body></html>"#,
                )
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/article", mock_server.uri());
    let capture = render(&url, Duration::from_secs(5))
        .await
        .expect("Render failed");

    match capture {
        Capture::Document { title, markup } => {
            assert_eq!(title, None);
            assert!(markup.contains("<title> Page Title </title>"));
            assert!(markup.contains("<p>Hello</p>"));
        }
        Capture::Pdf => panic!("Expected a document"),
    }
}

#[tokio::test]
async fn test_sends_user_agent() {
    let mock_server = MockServer::start().await;
    let expected = UserAgentConfig::default().header_value();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    assert!(render(&url, Duration::from_secs(5)).await.is_ok());
}

#[tokio::test]
async fn test_detects_pdf() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.7".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/paper.pdf", mock_server.uri());
    let capture = render(&url, Duration::from_secs(5))
        .await
        .expect("Render failed");

    assert_eq!(capture, Capture::Pdf);
}

#[tokio::test]
async fn test_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/gone", mock_server.uri());
    let result = render(&url, Duration::from_secs(5)).await;

    assert!(matches!(result, Err(RenderError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_hanging_page_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>too late</p>")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/slow", mock_server.uri());
    let started = std::time::Instant::now();
    let result = render(&url, Duration::from_millis(200)).await;

    assert!(matches!(
        result,
        Err(RenderError::Timeout {
            timeout_ms: 200,
            ..
        })
    ));
    assert!(started.elapsed() < Duration::from_secs(5));
}
