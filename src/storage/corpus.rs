//! Corpus persistence on top of a raw key-value store
//!
//! The whole corpus is serialized as one JSON blob. Missing, empty, or
//! unreadable blobs are treated as an empty corpus.

use crate::corpus::BookmarkCorpus;
use crate::storage::traits::{KeyValueStore, StorageError, StorageResult};
use std::sync::Arc;

/// Key the corpus blob is stored under
pub const CORPUS_KEY: &str = "bookmark-corpus";

/// Loads and saves the bookmark corpus
#[derive(Clone)]
pub struct CorpusStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CorpusStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Loads the stored corpus
    ///
    /// A missing key is initialized to an empty corpus so later raw dumps
    /// always see it.
    pub fn fetch_corpus(&self) -> StorageResult<BookmarkCorpus> {
        let raw = match self.kv.get(CORPUS_KEY)? {
            Some(raw) => raw,
            None => {
                self.reset_corpus()?;
                return Ok(BookmarkCorpus::new());
            }
        };

        if raw.trim().is_empty() {
            return Ok(BookmarkCorpus::new());
        }

        match serde_json::from_str::<BookmarkCorpus>(&raw) {
            Ok(corpus) => Ok(corpus),
            Err(e) => {
                tracing::warn!("Stored corpus is unreadable, treating it as empty: {}", e);
                Ok(BookmarkCorpus::new())
            }
        }
    }

    /// Replaces the stored corpus
    pub fn persist_corpus(&self, corpus: &BookmarkCorpus) -> StorageResult<()> {
        let raw =
            serde_json::to_string(corpus).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(CORPUS_KEY, &raw)?;
        tracing::debug!("Persisted corpus with {} entries ({} bytes)", corpus.len(), raw.len());
        Ok(())
    }

    /// Overwrites the stored corpus with an empty one
    pub fn reset_corpus(&self) -> StorageResult<()> {
        self.kv.set(CORPUS_KEY, "{}")
    }

    /// Size in bytes of the raw corpus blob, as stored
    pub fn raw_corpus_size(&self) -> StorageResult<usize> {
        let dump = self.kv.raw_dump()?;
        Ok(dump.get(CORPUS_KEY).map(String::len).unwrap_or(0))
    }
}
