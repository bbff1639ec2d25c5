//! Transport-facing service: scans, queries, and readiness
//!
//! `BookmarkService` wires a bookmark source, a renderer, and storage
//! together. Scans run on a background task and report over a channel;
//! queries and readiness go straight to the search service.

use crate::config::{Config, ScanConfig};
use crate::corpus::{
    collect_urls, diff_urls, BookmarkCorpus, BookmarkSource, CorpusDiff, JsonBookmarkFile,
};
use crate::scan::{build_http_client, ContentAcquirer, Coordinator, HttpRenderer, Renderer, ScanObserver};
use crate::search::{SearchResponse, SearchService};
use crate::storage::{open_storage, CorpusStore, KeyValueStore, RunHistory};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

/// Capacity of the scan progress channel
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// One progress message of a running scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanUpdate {
    /// Overall progress in `[0, 1]`
    pub progress: f64,
    /// True only on the final message
    pub done: bool,
    /// Why the scan failed, on a failed final message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanUpdate {
    fn running(progress: f64) -> Self {
        Self {
            progress,
            done: false,
            error: None,
        }
    }

    fn finished(error: Option<String>) -> Self {
        Self {
            progress: 1.0,
            done: true,
            error,
        }
    }
}

/// Counts of what a completed scan changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanSummary {
    added: usize,
    removed: usize,
    acquired: usize,
}

/// Forwards progress to the transport and persists checkpoints
///
/// Neither callback waits on the reader or on storage. Progress that does
/// not fit in the channel is dropped, and checkpoint writes run on the
/// blocking pool with at most one in flight.
struct ServiceObserver {
    updates: mpsc::Sender<ScanUpdate>,
    store: CorpusStore,
    pending_checkpoint: Mutex<Option<JoinHandle<()>>>,
}

impl ServiceObserver {
    fn new(updates: mpsc::Sender<ScanUpdate>, store: CorpusStore) -> Self {
        Self {
            updates,
            store,
            pending_checkpoint: Mutex::new(None),
        }
    }

    /// Waits for the checkpoint write still in flight, if any
    async fn flush(&self) {
        let pending = self.pending_checkpoint.lock().await.take();
        if let Some(handle) = pending {
            if let Err(e) = handle.await {
                tracing::warn!("Checkpoint write did not finish: {}", e);
            }
        }
    }
}

#[async_trait]
impl ScanObserver for ServiceObserver {
    async fn on_progress(&self, progress: f64) {
        match self.updates.try_send(ScanUpdate::running(progress)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Scan progress channel is full, dropping {:.4}", progress);
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Scan progress receiver is gone, dropping update");
            }
        }
    }

    async fn on_checkpoint(&self, corpus: &BookmarkCorpus) {
        let mut pending = self.pending_checkpoint.lock().await;
        if pending.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("Previous checkpoint still being written, skipping");
            return;
        }

        let store = self.store.clone();
        let snapshot = corpus.clone();
        *pending = Some(tokio::task::spawn_blocking(move || {
            match store.persist_corpus(&snapshot) {
                Ok(()) => tracing::debug!("Checkpoint saved with {} entries", snapshot.len()),
                Err(e) => tracing::warn!("Failed to save checkpoint: {}", e),
            }
        }));
    }
}

async fn send_update(updates: &mpsc::Sender<ScanUpdate>, update: ScanUpdate) {
    if updates.send(update).await.is_err() {
        tracing::debug!("Scan progress receiver is gone, dropping update");
    }
}

/// Bookmark scanning and search behind one handle
#[derive(Clone)]
pub struct BookmarkService {
    source: Arc<dyn BookmarkSource>,
    renderer: Arc<dyn Renderer>,
    store: CorpusStore,
    runs: Arc<dyn RunHistory>,
    search: Arc<SearchService>,
    scan_config: ScanConfig,
    config_hash: String,
    scan_lock: Arc<Mutex<()>>,
}

impl BookmarkService {
    /// Creates a service from its collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Scan and search settings
    /// * `config_hash` - Recorded on every scan run
    /// * `source` - Where the live bookmark tree comes from
    /// * `renderer` - How pages are loaded
    /// * `kv` - Raw storage for the corpus blob
    /// * `runs` - Scan run history
    pub fn new(
        config: &Config,
        config_hash: String,
        source: Arc<dyn BookmarkSource>,
        renderer: Arc<dyn Renderer>,
        kv: Arc<dyn KeyValueStore>,
        runs: Arc<dyn RunHistory>,
    ) -> Self {
        let store = CorpusStore::new(kv);
        let search = Arc::new(SearchService::new(
            store.clone(),
            config.search.result_limit,
        ));

        Self {
            source,
            renderer,
            store,
            runs,
            search,
            scan_config: config.scan.clone(),
            config_hash,
            scan_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a service backed by the configured bookmark file, an HTTP
    /// renderer, and the configured SQLite database
    pub fn from_config(config: &Config, config_hash: String) -> Result<Self> {
        let storage = Arc::new(open_storage(Path::new(&config.storage.database_path))?);
        let client = build_http_client(&config.user_agent)?;

        Ok(Self::new(
            config,
            config_hash,
            Arc::new(JsonBookmarkFile::new(&config.bookmarks.source_path)),
            Arc::new(HttpRenderer::new(client)),
            storage.clone(),
            storage,
        ))
    }

    /// The corpus store this service persists to
    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// The run history this service records scans in
    pub fn runs(&self) -> &Arc<dyn RunHistory> {
        &self.runs
    }

    /// Starts a scan in the background
    ///
    /// The receiver first gets `{progress: 0, done: false}`, then progress
    /// values, then exactly one final update with `done: true` carrying the
    /// error if the scan failed. Progress values that arrive while the
    /// channel is full are dropped, so a slow reader never stalls the scan.
    /// Scans started while another is running wait for it to finish.
    pub fn start_scan(&self, force_refresh: bool) -> mpsc::Receiver<ScanUpdate> {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let service = self.clone();

        tokio::spawn(async move {
            service.run_scan(force_refresh, tx).await;
        });

        rx
    }

    async fn run_scan(&self, force_refresh: bool, updates: mpsc::Sender<ScanUpdate>) {
        let error = self.run_locked_scan(force_refresh, &updates).await;

        // Sent once the scan lock is released; this is the only update that
        // waits for room in the channel
        send_update(&updates, ScanUpdate::finished(error)).await;
    }

    /// Runs one scan under the scan lock, returning why it failed
    async fn run_locked_scan(
        &self,
        force_refresh: bool,
        updates: &mpsc::Sender<ScanUpdate>,
    ) -> Option<String> {
        let _guard = self.scan_lock.lock().await;
        send_update(updates, ScanUpdate::running(0.0)).await;

        let run_id = match self.runs.create_run(&self.config_hash, force_refresh) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Failed to record scan run: {}", e);
                None
            }
        };

        tracing::info!(
            "Starting scan{}",
            if force_refresh { " (force refresh)" } else { "" }
        );

        match self.scan_and_sync(force_refresh, updates).await {
            Ok(summary) => {
                tracing::info!(
                    "Scan finished: {} added ({} acquired), {} removed",
                    summary.added,
                    summary.acquired,
                    summary.removed
                );
                if let Some(id) = run_id {
                    if let Err(e) =
                        self.runs
                            .complete_run(id, summary.added, summary.removed, summary.acquired)
                    {
                        tracing::warn!("Failed to complete scan run {}: {}", id, e);
                    }
                }
                None
            }
            Err(e) => {
                tracing::error!("Scan failed: {}", e);
                if let Some(id) = run_id {
                    if let Err(e) = self.runs.fail_run(id, &e.to_string()) {
                        tracing::warn!("Failed to mark scan run {} as failed: {}", id, e);
                    }
                }
                Some(e.to_string())
            }
        }
    }

    async fn scan_and_sync(
        &self,
        force_refresh: bool,
        updates: &mpsc::Sender<ScanUpdate>,
    ) -> Result<ScanSummary> {
        let corpus = self.store.fetch_corpus()?;

        let acquirer = ContentAcquirer::new(self.renderer.clone(), &self.scan_config);
        let mut coordinator = Coordinator::new(self.source.clone(), acquirer, &self.scan_config);
        let observer = ServiceObserver::new(updates.clone(), self.store.clone());

        let scanned = coordinator.scan(&corpus, force_refresh, &observer).await;
        // A late checkpoint must not overwrite the synchronized corpus
        observer.flush().await;
        let manifest = scanned?;
        let summary = ScanSummary {
            added: manifest.added.urls.len(),
            removed: manifest.removed.urls.len(),
            acquired: manifest.added.entries.len(),
        };

        self.search.sync_scan(manifest).await?;
        Ok(summary)
    }

    /// Computes what a scan would change without acquiring anything
    pub async fn preview(&self, force_refresh: bool) -> Result<CorpusDiff> {
        let tree = self.source.get_tree().await?;
        let live_urls = collect_urls(&tree);

        if force_refresh {
            let known: Vec<String> = Vec::new();
            return Ok(diff_urls(&known, &live_urls));
        }

        let corpus = self.store.fetch_corpus()?;
        Ok(diff_urls(corpus.keys(), &live_urls))
    }

    /// Runs a query, initializing the index first if needed
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            return Ok(SearchResponse::default());
        }

        self.search.initialize().await?;
        Ok(self.search.search(query).await)
    }

    /// Subscribes to index readiness and kicks off initialization
    pub fn query_ready(&self) -> watch::Receiver<bool> {
        let receiver = self.search.subscribe_ready();
        let search = self.search.clone();

        tokio::spawn(async move {
            if let Err(e) = search.initialize().await {
                tracing::error!("Failed to initialize search index: {}", e);
            }
        });

        receiver
    }

    /// Erases the stored corpus and rebuilds the index
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.scan_lock.lock().await;
        self.search.reset().await
    }
}
