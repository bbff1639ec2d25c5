//! Full scan-then-search cycle against a mock server

use bookmark_sift::config::{
    BookmarksConfig, Config, ScanConfig, SearchConfig, StorageConfig, UserAgentConfig,
};
use bookmark_sift::scan::pdf_viewer_url;
use bookmark_sift::service::ScanUpdate;
use bookmark_sift::storage::{open_storage, RunHistory, RunStatus};
use bookmark_sift::BookmarkService;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration reading bookmarks and storing data under `dir`
fn create_test_config(dir: &Path, viewer_prefix: &str) -> Config {
    Config {
        bookmarks: BookmarksConfig {
            source_path: dir.join("Bookmarks").display().to_string(),
        },
        scan: ScanConfig {
            concurrency: 4,
            checkpoint_interval: 2,
            initial_delay_ms: 10, // Very short for testing
            timeout_ms: 500,
            pdf_viewer_url: viewer_prefix.to_string(),
        },
        search: SearchConfig { result_limit: 20 },
        user_agent: UserAgentConfig {
            name: "TestBot".to_string(),
            version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        storage: StorageConfig {
            database_path: dir.join("sift.db").display().to_string(),
        },
    }
}

/// Writes a Chromium-style bookmarks file holding `urls`
fn write_bookmarks(dir: &Path, urls: &[String]) {
    let (first, rest) = urls.split_at(urls.len().min(1));
    let node = |url: &String| serde_json::json!({ "type": "url", "name": url, "url": url });

    let bookmarks = serde_json::json!({
        "version": 1,
        "roots": {
            "bookmark_bar": {
                "type": "folder",
                "name": "Bookmarks bar",
                "children": first.iter().map(node).collect::<Vec<_>>(),
            },
            "other": {
                "type": "folder",
                "name": "Other bookmarks",
                "children": [
                    {
                        "type": "folder",
                        "name": "Reading",
                        "children": rest.iter().map(node).collect::<Vec<_>>(),
                    },
                    { "type": "folder", "name": "Empty", "children": [] }
                ],
            },
        }
    });

    std::fs::write(dir.join("Bookmarks"), bookmarks.to_string())
        .expect("Failed to write bookmarks");
}

fn html(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body><nav>Menu</nav><article>{}</article></body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_site(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sourdough"))
        .respond_with(html(
            "Sourdough Basics",
            "<p>Feed the starter   twice a day.</p><p>Bake when bubbly.</p>",
        ))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rust"))
        .respond_with(html(
            "Rust Ownership",
            "<p>Every value has a single owner.</p>",
        ))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.7".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/viewer"))
        .and(query_param(
            "url",
            format!("{}/paper.pdf", mock_server.uri()).as_str(),
        ))
        .respond_with(html(
            "paper.pdf",
            "<p>Consensus protocols tolerate crash faults.</p>",
        ))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hanging"))
        .respond_with(html("Never", "<p>never</p>").set_delay(Duration::from_secs(30)))
        .mount(mock_server)
        .await;
}

async fn drain(mut rx: mpsc::Receiver<ScanUpdate>) -> Vec<ScanUpdate> {
    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn test_full_scan_and_search() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let viewer_prefix = format!("{}/viewer?url=", base_url);
    let config = create_test_config(dir.path(), &viewer_prefix);

    let urls: Vec<String> = ["sourdough", "rust", "paper.pdf", "missing", "hanging"]
        .iter()
        .map(|p| format!("{}/{}", base_url, p))
        .chain(std::iter::once("javascript:void(0)".to_string()))
        .collect();
    write_bookmarks(dir.path(), &urls);

    let service = BookmarkService::from_config(&config, "test-hash".to_string())
        .expect("Failed to create service");

    let updates = drain(service.start_scan(false)).await;

    // Transport contract
    assert_eq!(updates.first().map(|u| u.progress), Some(0.0));
    let last = updates.last().expect("No updates received");
    assert!(last.done);
    assert_eq!(last.progress, 1.0);
    assert!(last.error.is_none(), "Scan failed: {:?}", last.error);
    assert_eq!(updates.iter().filter(|u| u.done).count(), 1);
    for pair in updates.windows(2) {
        assert!(pair[0].progress <= pair[1].progress, "Progress went backwards");
    }

    // Only the pages with readable content made it into the corpus
    let corpus = service.store().fetch_corpus().expect("Failed to load corpus");
    assert_eq!(corpus.len(), 3, "Unexpected corpus: {:?}", corpus.keys());

    let sourdough = &corpus[&format!("{}/sourdough", base_url)];
    assert_eq!(sourdough.title, "Sourdough Basics");
    assert_eq!(sourdough.content, "Feed the starter twice a day. Bake when bubbly.");

    let paper = &corpus[&format!("{}/paper.pdf", base_url)];
    assert_eq!(paper.content, "Consensus protocols tolerate crash faults.");

    // Search over the freshly synchronized index
    let response = service.search("starter").await.expect("Search failed");
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].entry.url, format!("{}/sourdough", base_url));

    let response = service.search("ownersip").await.expect("Search failed");
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].entry.title, "Rust Ownership");

    // Run history
    let storage = open_storage(Path::new(&config.storage.database_path))
        .expect("Failed to open storage");
    let run = storage
        .get_latest_run()
        .expect("Failed to query runs")
        .expect("No run recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");
    assert_eq!(run.added_count, Some(6));
    assert_eq!(run.acquired_count, Some(3));
    assert_eq!(run.removed_count, Some(0));
}

#[tokio::test]
async fn test_rescan_picks_up_changes() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), &format!("{}/viewer?url=", base_url));

    let sourdough = format!("{}/sourdough", base_url);
    let rust = format!("{}/rust", base_url);
    write_bookmarks(dir.path(), &[sourdough.clone()]);

    let service = BookmarkService::from_config(&config, "hash".to_string())
        .expect("Failed to create service");
    drain(service.start_scan(false)).await;
    assert_eq!(service.search("starter").await.unwrap().results.len(), 1);

    // Swap the sourdough bookmark for the rust one
    write_bookmarks(dir.path(), &[rust.clone()]);
    drain(service.start_scan(false)).await;

    let corpus = service.store().fetch_corpus().unwrap();
    assert_eq!(corpus.keys().collect::<Vec<_>>(), vec![&rust]);
    assert!(service.search("starter").await.unwrap().results.is_empty());
    assert_eq!(service.search("owner").await.unwrap().results.len(), 1);

    // A second service on the same database sees the persisted corpus
    let reopened = BookmarkService::from_config(&config, "hash".to_string())
        .expect("Failed to reopen service");
    let mut ready = reopened.query_ready();
    ready.wait_for(|ready| *ready).await.unwrap();
    assert_eq!(reopened.search("owner").await.unwrap().results.len(), 1);
}

#[tokio::test]
async fn test_missing_bookmark_file_fails_scan() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), "https://viewer.invalid/?url=");

    let service = BookmarkService::from_config(&config, "hash".to_string())
        .expect("Failed to create service");
    let updates = drain(service.start_scan(false)).await;

    let last = updates.last().expect("No updates received");
    assert!(last.done);
    assert!(last
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("Failed to read bookmark file"));

    let storage = open_storage(Path::new(&config.storage.database_path)).unwrap();
    assert_eq!(storage.count_runs_by_status(RunStatus::Failed).unwrap(), 1);
}

#[test]
fn test_viewer_url_matches_mock_query() {
    // The viewer mock matches on the decoded query value
    let url = pdf_viewer_url("http://127.0.0.1:1/viewer?url=", "http://127.0.0.1:1/paper.pdf");
    let parsed = url::Url::parse(&url).unwrap();
    let value = parsed
        .query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned());
    assert_eq!(value.as_deref(), Some("http://127.0.0.1:1/paper.pdf"));
}
