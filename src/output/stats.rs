//! Statistics over the stored corpus and scan history
//!
//! This module provides functionality for extracting and displaying
//! corpus statistics from the storage layer.

use crate::storage::{CorpusStore, RunHistory, RunRecord, RunStatus};
use crate::SiftError;

/// Corpus statistics summary
#[derive(Debug, Clone)]
pub struct CorpusStatistics {
    /// Number of bookmarks with extracted content
    pub total_entries: u64,

    /// Sum of the content lengths, in characters
    pub total_content_chars: u64,

    /// Size of the persisted corpus blob, in bytes
    pub raw_blob_bytes: u64,

    /// Count of scan runs by status
    pub runs_by_status: Vec<(RunStatus, u64)>,

    /// Most recent scan run, if any
    pub latest_run: Option<RunRecord>,
}

impl CorpusStatistics {
    /// Total number of recorded scan runs
    pub fn total_runs(&self) -> u64 {
        self.runs_by_status.iter().map(|(_, count)| count).sum()
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The corpus store to measure
/// * `runs` - The scan run history to summarize
///
/// # Returns
///
/// * `Ok(CorpusStatistics)` - Successfully loaded statistics
/// * `Err(SiftError)` - Failed to query statistics
pub fn load_statistics(
    store: &CorpusStore,
    runs: &dyn RunHistory,
) -> Result<CorpusStatistics, SiftError> {
    let corpus = store.fetch_corpus()?;
    let total_content_chars = corpus
        .values()
        .map(|entry| entry.content.chars().count() as u64)
        .sum();

    let raw_blob_bytes = store.raw_corpus_size()? as u64;

    let mut runs_by_status = Vec::new();
    for status in [RunStatus::Completed, RunStatus::Failed, RunStatus::Running] {
        let count = runs.count_runs_by_status(status)?;
        if count > 0 {
            runs_by_status.push((status, count));
        }
    }

    Ok(CorpusStatistics {
        total_entries: corpus.len() as u64,
        total_content_chars,
        raw_blob_bytes,
        runs_by_status,
        latest_run: runs.get_latest_run()?,
    })
}

/// Duration of a finished run in seconds
pub fn run_duration_seconds(run: &RunRecord) -> Option<u64> {
    let started = run.started_at.parse::<chrono::DateTime<chrono::Utc>>().ok()?;
    let finished = run
        .finished_at
        .as_ref()?
        .parse::<chrono::DateTime<chrono::Utc>>()
        .ok()?;

    u64::try_from((finished - started).num_seconds()).ok()
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CorpusStatistics) {
    println!("=== Corpus Statistics ===\n");

    println!("Overview:");
    println!("  Bookmarks indexed: {}", stats.total_entries);
    println!("  Content characters: {}", stats.total_content_chars);
    println!("  Stored corpus size: {} bytes", stats.raw_blob_bytes);
    if stats.total_entries > 0 {
        println!(
            "  Average content length: {:.0} characters",
            stats.total_content_chars as f64 / stats.total_entries as f64
        );
    }
    println!();

    println!("Scan Runs ({}):", stats.total_runs());
    for (status, count) in &stats.runs_by_status {
        println!("  {}: {}", status.to_db_string(), count);
    }
    println!();

    if let Some(run) = &stats.latest_run {
        println!("Latest Scan:");
        println!("  Run ID: {}", run.id);
        println!("  Started: {}", run.started_at);
        println!("  Status: {}", run.status.to_db_string());
        if run.force_refresh {
            println!("  Force refresh: yes");
        }
        if let Some(seconds) = run_duration_seconds(run) {
            println!("  Duration: {}s", seconds);
        }
        if let (Some(added), Some(acquired), Some(removed)) =
            (run.added_count, run.acquired_count, run.removed_count)
        {
            println!(
                "  Changes: {} added ({} acquired), {} removed",
                added, acquired, removed
            );
        }
        if let Some(error) = &run.error_message {
            println!("  Error: {}", error);
        }
    }
}
