//! Search service: the index plus its lifecycle and storage binding

use crate::corpus::{ScanManifest, ScoredEntry};
use crate::search::index::SearchIndex;
use crate::state::IndexStatus;
use crate::storage::CorpusStore;
use crate::Result;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::{watch, RwLock};

/// Results of one query, with how long it took
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredEntry>,
    pub elapsed_ms: u64,
}

/// Owns the search index and keeps it in step with the stored corpus
///
/// Readiness moves `NotReady -> InProgress -> Ready`; every change is
/// published to subscribers.
pub struct SearchService {
    store: CorpusStore,
    index: RwLock<SearchIndex>,
    status: watch::Sender<IndexStatus>,
    ready: watch::Sender<bool>,
    result_limit: usize,
}

impl SearchService {
    /// Creates a service with an empty, not yet initialized index
    pub fn new(store: CorpusStore, result_limit: usize) -> Self {
        let (status, _) = watch::channel(IndexStatus::NotReady);
        let (ready, _) = watch::channel(false);

        Self {
            store,
            index: RwLock::new(SearchIndex::new()),
            status,
            ready,
            result_limit,
        }
    }

    /// Current readiness of the index
    pub fn status(&self) -> IndexStatus {
        *self.status.borrow()
    }

    /// Subscribes to readiness changes
    ///
    /// The receiver starts with the current value, so a subscriber that
    /// arrives after initialization still observes `true`.
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    /// Subscribes to the full status
    pub fn subscribe_status(&self) -> watch::Receiver<IndexStatus> {
        self.status.subscribe()
    }

    fn set_status(&self, status: IndexStatus) {
        tracing::debug!("Search index status: {}", status);
        self.status.send_replace(status);
        self.ready.send_replace(status.is_ready());
    }

    /// Loads the stored corpus and indexes all of it
    ///
    /// Does nothing unless the index is `NotReady`. On a storage failure the
    /// index goes back to `NotReady`.
    pub async fn initialize(&self) -> Result<()> {
        let mut index = self.index.write().await;
        if self.status() != IndexStatus::NotReady {
            return Ok(());
        }

        self.set_status(IndexStatus::InProgress);

        let corpus = match self.store.fetch_corpus() {
            Ok(corpus) => corpus,
            Err(e) => {
                self.set_status(IndexStatus::NotReady);
                return Err(e.into());
            }
        };

        index.clear();
        index.add_or_update(corpus.values());
        tracing::info!("Search index ready with {} entries", index.len());

        self.set_status(IndexStatus::Ready);
        Ok(())
    }

    /// Throws the index away and rebuilds it from storage
    pub async fn reinitialize(&self) -> Result<()> {
        {
            let mut index = self.index.write().await;
            index.clear();
            self.set_status(IndexStatus::NotReady);
        }
        self.initialize().await
    }

    /// Applies a scan's outcome to storage and the index
    ///
    /// The updated corpus is persisted first, then removed URLs are
    /// dropped from the index, then added entries are indexed.
    pub async fn sync_scan(&self, manifest: ScanManifest) -> Result<()> {
        self.store.persist_corpus(&manifest.updated_corpus)?;

        let mut index = self.index.write().await;
        index.remove(&manifest.removed.urls);
        index.add_or_update(manifest.added.entries.values());

        tracing::debug!(
            "Index synchronized: -{} +{} ({} entries)",
            manifest.removed.urls.len(),
            manifest.added.entries.len(),
            index.len()
        );
        Ok(())
    }

    /// Runs a ranked query
    ///
    /// A blank query returns no results without touching the index.
    pub async fn search(&self, query: &str) -> SearchResponse {
        if query.trim().is_empty() {
            return SearchResponse::default();
        }

        let start = Instant::now();
        let index = self.index.read().await;
        let results = index.search(query, self.result_limit);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("Query {:?}: {} results in {}ms", query, results.len(), elapsed_ms);
        SearchResponse {
            results,
            elapsed_ms,
        }
    }

    /// Erases the stored corpus and rebuilds the (now empty) index
    pub async fn reset(&self) -> Result<()> {
        self.store.reset_corpus()?;
        tracing::info!("Stored corpus erased");
        self.reinitialize().await
    }
}
