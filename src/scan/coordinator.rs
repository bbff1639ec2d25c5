//! Scan coordinator - corpus synchronization logic
//!
//! This module contains the scan pass that reconciles the corpus with the
//! live bookmark tree:
//! - Enumerating bookmarks and diffing them against the known corpus
//! - Dropping entries for removed bookmarks
//! - Acquiring content for added bookmarks through a bounded pool
//! - Reporting weighted progress and taking periodic checkpoints

use crate::config::ScanConfig;
use crate::corpus::{
    collect_urls, diff_urls, AddedBookmarks, BookmarkCorpus, BookmarkSource, RemovedBookmarks,
    ScanManifest,
};
use crate::scan::acquire::ContentAcquirer;
use crate::scan::progress::ProgressTracker;
use crate::state::ScanPhase;
use crate::SiftError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Weight of the removal phase in overall progress
const REMOVE_WEIGHT: f64 = 0.1;

/// Weight of the acquisition phase in overall progress
const ACQUIRE_WEIGHT: f64 = 0.9;

/// Receives progress and checkpoints while a scan runs
///
/// Implementations must not fail the scan: delivery errors are theirs to
/// log and swallow.
#[async_trait]
pub trait ScanObserver: Send + Sync {
    /// Overall progress in `[0, 1]`, non-decreasing within one scan
    async fn on_progress(&self, progress: f64);

    /// Snapshot of the in-progress corpus to persist
    async fn on_checkpoint(&self, corpus: &BookmarkCorpus);
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl ScanObserver for NoopObserver {
    async fn on_progress(&self, _progress: f64) {}

    async fn on_checkpoint(&self, _corpus: &BookmarkCorpus) {}
}

/// Main scan coordinator structure
pub struct Coordinator {
    source: Arc<dyn BookmarkSource>,
    acquirer: ContentAcquirer,
    concurrency: usize,
    checkpoint_interval: usize,
    phase: ScanPhase,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `source` - Where the live bookmark tree comes from
    /// * `acquirer` - Turns added URLs into corpus entries
    /// * `config` - Pool size and checkpoint interval
    pub fn new(
        source: Arc<dyn BookmarkSource>,
        acquirer: ContentAcquirer,
        config: &ScanConfig,
    ) -> Self {
        Self {
            source,
            acquirer,
            concurrency: config.concurrency.max(1),
            checkpoint_interval: config.checkpoint_interval.max(1),
            phase: ScanPhase::Idle,
        }
    }

    /// Current phase of the scan
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    fn transition(&mut self, next: ScanPhase) -> Result<(), SiftError> {
        if !self.phase.can_transition_to(next) {
            return Err(SiftError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::debug!("Scan phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Runs one synchronization pass
    ///
    /// The input corpus is cloned; only the clone is modified and returned
    /// in the manifest. With `force_refresh`, every live bookmark is treated
    /// as new and re-acquired.
    ///
    /// Failures of individual URLs are skipped. A failure to read the
    /// bookmark tree aborts the scan before anything is modified.
    pub async fn scan(
        &mut self,
        corpus: &BookmarkCorpus,
        force_refresh: bool,
        observer: &dyn ScanObserver,
    ) -> Result<ScanManifest, SiftError> {
        let start_time = Instant::now();
        self.transition(ScanPhase::Collecting)?;

        let tree = match self.source.get_tree().await {
            Ok(tree) => tree,
            Err(e) => {
                self.phase = ScanPhase::Idle;
                return Err(e.into());
            }
        };
        let live_urls = collect_urls(&tree);

        let mut updated = corpus.clone();
        let known_urls: Vec<String> = if force_refresh {
            Vec::new()
        } else {
            updated.keys().cloned().collect()
        };

        let diff = diff_urls(&known_urls, &live_urls);
        tracing::info!(
            "Bookmarks: {} live, {} to add, {} to remove",
            live_urls.len(),
            diff.added.len(),
            diff.removed.len()
        );

        let mut tracker = ProgressTracker::with_weights(vec![REMOVE_WEIGHT, ACQUIRE_WEIGHT]);
        observer.on_progress(tracker.update(&[0.0, 0.0])).await;

        // Remove stale entries
        self.transition(ScanPhase::Removing)?;
        let removed_total = diff.removed.len();
        for (index, url) in diff.removed.iter().enumerate() {
            updated.remove(url);
            let fraction = (index + 1) as f64 / removed_total as f64;
            observer.on_progress(tracker.update(&[fraction, 0.0])).await;
        }
        observer.on_progress(tracker.update(&[1.0, 0.0])).await;

        // Acquire content for new bookmarks
        self.transition(ScanPhase::Acquiring)?;
        let added_entries = self
            .acquire_all(&diff.added, &mut updated, &mut tracker, observer)
            .await;
        observer.on_progress(tracker.update(&[1.0, 1.0])).await;

        self.transition(ScanPhase::Done)?;
        tracing::info!(
            "Scan completed in {:?}: {} removed, {} of {} added bookmarks acquired",
            start_time.elapsed(),
            diff.removed.len(),
            added_entries.len(),
            diff.added.len()
        );

        Ok(ScanManifest {
            updated_corpus: updated,
            added: AddedBookmarks {
                urls: diff.added,
                entries: added_entries,
            },
            removed: RemovedBookmarks {
                urls: diff.removed,
            },
        })
    }

    /// Acquires every added URL with at most `concurrency` in flight
    ///
    /// Completions are handled one at a time on this task, so the corpus,
    /// the added map and the completed count are only ever touched here.
    async fn acquire_all(
        &self,
        added: &BTreeSet<String>,
        corpus: &mut BookmarkCorpus,
        tracker: &mut ProgressTracker,
        observer: &dyn ScanObserver,
    ) -> BookmarkCorpus {
        let total = added.len();
        let mut added_entries = BookmarkCorpus::new();
        let mut completed = 0usize;
        let acquirer = &self.acquirer;
        let started = Instant::now();

        let mut results = stream::iter(added.iter().cloned())
            .map(|url| async move { acquirer.acquire(&url).await })
            .buffer_unordered(self.concurrency);

        while let Some(entry) = results.next().await {
            if let Some(entry) = entry {
                corpus.insert(entry.url.clone(), entry.clone());
                added_entries.insert(entry.url.clone(), entry);
            }

            completed += 1;
            let fraction = completed as f64 / total as f64;
            observer.on_progress(tracker.update(&[1.0, fraction])).await;

            if completed % self.checkpoint_interval == 0 {
                let rate = completed as f64 / started.elapsed().as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {}/{} bookmarks processed, {} acquired, {:.2} bookmarks/sec",
                    completed,
                    total,
                    added_entries.len(),
                    rate
                );
                observer.on_checkpoint(corpus).await;
            }
        }

        added_entries
    }
}
