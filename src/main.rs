//! Bookmark-Sift main entry point
//!
//! This is the command-line interface for the Bookmark-Sift bookmark mirror.

use anyhow::{bail, Context};
use bookmark_sift::config::{load_config_with_hash, Config};
use bookmark_sift::output::{load_statistics, print_statistics};
use bookmark_sift::BookmarkService;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bookmark-Sift: a searchable local mirror of your bookmarks
///
/// Bookmark-Sift reads your bookmark file, fetches readable text for every
/// new bookmark, and keeps a full-text index of titles and contents that
/// you can query from the command line.
#[derive(Parser, Debug)]
#[command(name = "bookmark-sift")]
#[command(version)]
#[command(about = "A searchable local mirror of your bookmarks", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Re-acquire every bookmark instead of only the new ones
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "search", "reset"])]
    fresh: bool,

    /// Validate config and show what a scan would change without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "search", "reset"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "search", "reset"])]
    stats: bool,

    /// Search the indexed bookmarks and exit
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["dry_run", "stats", "reset"])]
    search: Option<String>,

    /// Erase the stored corpus and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "search"])]
    reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let service = BookmarkService::from_config(&config, config_hash)
        .context("failed to open bookmark storage")?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &service).await
    } else if cli.stats {
        handle_stats(&config, &service)
    } else if let Some(query) = cli.search.as_deref() {
        handle_search(&service, query).await
    } else if cli.reset {
        handle_reset(&config, &service).await
    } else {
        handle_scan(&service, cli.fresh, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bookmark_sift=info,warn"),
            1 => EnvFilter::new("bookmark_sift=debug,info"),
            2 => EnvFilter::new("bookmark_sift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what a scan would do
async fn handle_dry_run(config: &Config, service: &BookmarkService) -> anyhow::Result<()> {
    println!("=== Bookmark-Sift Dry Run ===\n");

    println!("Bookmarks:");
    println!("  Source: {}", config.bookmarks.source_path);

    println!("\nScan Configuration:");
    println!("  Concurrency: {}", config.scan.concurrency);
    println!("  Checkpoint interval: {}", config.scan.checkpoint_interval);
    println!("  Initial delay: {}ms", config.scan.initial_delay_ms);
    println!("  Timeout: {}ms", config.scan.timeout_ms);
    println!("  PDF viewer: {}", config.scan.pdf_viewer_url);

    println!("\nUser Agent: {}", config.user_agent.header_value());
    println!("Database: {}", config.storage.database_path);
    println!("Result limit: {}", config.search.result_limit);

    let diff = service
        .preview(false)
        .await
        .context("failed to read bookmarks")?;

    println!("\nBookmarks to acquire ({}):", diff.added.len());
    for url in &diff.added {
        println!("  + {}", url);
    }

    println!("\nBookmarks to remove ({}):", diff.removed.len());
    for url in &diff.removed {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config, service: &BookmarkService) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let stats = load_statistics(service.store(), service.runs().as_ref())?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --search mode: prints ranked results
async fn handle_search(service: &BookmarkService, query: &str) -> anyhow::Result<()> {
    let response = service.search(query).await?;

    if response.results.is_empty() {
        println!("No results for {:?}", query);
        return Ok(());
    }

    println!(
        "{} results for {:?} ({}ms)\n",
        response.results.len(),
        query,
        response.elapsed_ms
    );
    for (rank, result) in response.results.iter().enumerate() {
        println!("{:>3}. {}", rank + 1, result.entry.title);
        println!("     {}", result.entry.url);
    }

    Ok(())
}

/// Handles the --reset mode: erases the stored corpus
async fn handle_reset(config: &Config, service: &BookmarkService) -> anyhow::Result<()> {
    service.reset().await?;
    println!("✓ Corpus erased in {}", config.storage.database_path);
    Ok(())
}

/// Handles the main scan operation
async fn handle_scan(service: &BookmarkService, fresh: bool, quiet: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh scan (re-acquiring every bookmark)");
    } else {
        tracing::info!("Starting scan (acquiring new bookmarks only)");
    }

    let mut updates = service.start_scan(fresh);
    while let Some(update) = updates.recv().await {
        if !quiet {
            println!("Progress: {:.2}%", update.progress * 100.0);
        }

        if update.done {
            if let Some(error) = update.error {
                bail!("scan failed: {}", error);
            }
            tracing::info!("Scan completed successfully");
            break;
        }
    }

    Ok(())
}
