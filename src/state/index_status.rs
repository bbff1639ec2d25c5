/// Readiness of the search index
use std::fmt;

/// Lifecycle of the in-memory search index
///
/// `NotReady -> InProgress -> Ready`; a reinitialization drops back to
/// `NotReady` before replaying the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexStatus {
    /// Nothing has been indexed yet (or the index was discarded)
    #[default]
    NotReady,

    /// The stored corpus is being loaded and indexed
    InProgress,

    /// The index reflects the stored corpus and can serve queries
    Ready,
}

impl IndexStatus {
    /// Returns true only for `Ready`
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "not_ready",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
