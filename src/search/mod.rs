//! Full-text search over the bookmark corpus
//!
//! This module contains:
//! - Tokenization and typo-tolerant term matching
//! - The two-field inverted index and its ranked merge
//! - The service that ties the index to storage and readiness

mod fuzzy;
mod index;
mod merge;
mod service;
mod tokenize;

pub use fuzzy::{bounded_distance, max_edits};
pub use index::SearchIndex;
pub use merge::{merge_ranked, FieldHit};
pub use service::{SearchResponse, SearchService};
pub use tokenize::{query_terms, tokenize};
