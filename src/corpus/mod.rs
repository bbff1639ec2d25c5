//! Corpus data model
//!
//! The corpus is the full mapping of bookmark URL to extracted title and
//! content. This module also holds the bookmark tree contract and the diff
//! between a known corpus and the live tree.

mod diff;
mod tree;

pub use diff::{diff_urls, CorpusDiff};
pub use tree::{collect_urls, BookmarkNode, BookmarkSource, JsonBookmarkFile};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A bookmarked page with its extracted readable text
///
/// Entries are replaced wholesale when a page is scraped again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// URL -> entry mapping for every successfully scraped bookmark
pub type BookmarkCorpus = BTreeMap<String, BookmarkEntry>;

/// Bookmarks that appeared since the last scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddedBookmarks {
    /// Every URL classified as added, whether or not acquisition succeeded
    pub urls: BTreeSet<String>,
    /// Entries that were acquired during this scan
    pub entries: BookmarkCorpus,
}

/// Bookmarks that disappeared since the last scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovedBookmarks {
    pub urls: BTreeSet<String>,
}

/// Outcome of one scan, consumed once to update the index and storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanManifest {
    pub updated_corpus: BookmarkCorpus,
    pub added: AddedBookmarks,
    pub removed: RemovedBookmarks,
}

impl ScanManifest {
    /// Returns true if the scan changed nothing
    pub fn is_empty(&self) -> bool {
        self.added.urls.is_empty() && self.removed.urls.is_empty()
    }
}

/// A search hit: the stored entry plus the engine's relevance score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: BookmarkEntry,
    pub score: f64,
}
