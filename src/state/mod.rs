//! State module for tracking scan and index lifecycles
//!
//! # Components
//!
//! - `ScanPhase`: Where a synchronization pass currently is (collecting, removing, acquiring, ...)
//! - `IndexStatus`: Readiness of the search index (not ready, in progress, ready)

mod index_status;
mod scan_phase;

// Re-export main types
pub use index_status::IndexStatus;
pub use scan_phase::ScanPhase;
