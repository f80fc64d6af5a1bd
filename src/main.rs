//! Harvest main entry point
//!
//! This is the command-line interface for the Harvest record crawler.

use clap::Parser;
use harvest::config::{load_config_with_hash, Config};
use harvest::crawler::run_harvest;
use harvest::output::{print_statistics, save_records, CrawlStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Harvest: a configuration-driven record crawler
///
/// Harvest crawls each configured site page by page, following its
/// "next page" link, extracts records with CSS selectors, and writes all
/// records to a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(version)]
#[command(about = "A configuration-driven record crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Write records here instead of the configured output_file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let output_path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output_file));

    if cli.dry_run {
        handle_dry_run(&config, &output_path);
    } else {
        handle_crawl(&config, &output_path, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("harvest=info,warn"),
            1 => EnvFilter::new("harvest=debug,info"),
            2 => EnvFilter::new("harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, output_path: &Path) {
    println!("=== Harvest Dry Run ===\n");

    println!("HTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);

    println!("\nOutput:");
    println!("  Records: {}", output_path.display());

    println!("\nSites ({}):", config.sites.len());
    for site in &config.sites {
        println!("  - {}", site.url);
        println!("    record block: {}", site.parsing_rules.quote_block);
        match &site.next_page_selector {
            Some(selector) => println!("    next page: {} (base '{}')", selector, site.base_url),
            None => println!("    next page: disabled"),
        }
        if let Some(max) = site.max_pages {
            println!("    max pages: {}", max);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    output_path: &Path,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting crawl of {} sites", config.sites.len());

    let result = match run_harvest(config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Crawl completed: {} records from {} pages",
        result.records.len(),
        result.pages_fetched()
    );

    save_records(&result.records, output_path)?;

    if !quiet {
        print_statistics(&CrawlStatistics::from_result(&result));
    }

    Ok(())
}
