//! Output module for reporting on the corpus
//!
//! This module handles:
//! - Summarizing the stored corpus and its scan history
//! - Printing statistics for the command line

pub mod stats;

pub use stats::{load_statistics, print_statistics, run_duration_seconds, CorpusStatistics};
