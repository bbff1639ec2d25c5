/// Scan phase definitions for tracking a synchronization pass
///
/// A scan moves strictly forward through its phases; a fresh scan instance
/// starts at `Idle` and finishes at `Done`.
use std::fmt;

/// Represents the current phase of a bookmark scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanPhase {
    /// No scan has started on this coordinator
    Idle,

    /// Enumerating the live bookmark tree and computing the diff
    Collecting,

    /// Deleting corpus entries for bookmarks that no longer exist
    Removing,

    /// Fetching and extracting content for newly added bookmarks
    Acquiring,

    /// The scan finished and its manifest was produced
    Done,
}

impl ScanPhase {
    /// Returns true if the scan is currently running
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Collecting | Self::Removing | Self::Acquiring)
    }

    /// Returns true if `next` is a legal successor of this phase
    ///
    /// Phases only move forward one step at a time, except that a
    /// finished or idle coordinator may begin collecting again.
    pub fn can_transition_to(&self, next: ScanPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Collecting)
                | (Self::Collecting, Self::Removing)
                | (Self::Removing, Self::Acquiring)
                | (Self::Acquiring, Self::Done)
                | (Self::Done, Self::Collecting)
        )
    }

    /// Lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Removing => "removing",
            Self::Acquiring => "acquiring",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
