//! Statistics generation from a crawl result
//!
//! This module provides functionality for summarising and displaying
//! per-site crawl outcomes.

use crate::crawler::{CrawlResult, SiteSummary};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of configured sites
    pub total_sites: usize,

    /// Sites that ended on their last page or page limit
    pub completed_sites: usize,

    /// Total number of pages fetched
    pub total_pages: usize,

    /// Total number of records extracted
    pub total_records: usize,

    /// Per-site outcomes, in configuration order
    pub sites: Vec<SiteSummary>,
}

impl CrawlStatistics {
    /// Summarises a crawl result
    pub fn from_result(result: &CrawlResult) -> Self {
        Self {
            total_sites: result.sites.len(),
            completed_sites: result.sites.iter().filter(|s| s.stop.is_success()).count(),
            total_pages: result.pages_fetched(),
            total_records: result.records.len(),
            sites: result.sites.clone(),
        }
    }

    /// Sites that stopped because of a failure
    pub fn failed_sites(&self) -> impl Iterator<Item = &SiteSummary> {
        self.sites.iter().filter(|s| !s.stop.is_success())
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Sites crawled: {}", stats.total_sites);
    println!("  Pages fetched: {}", stats.total_pages);
    println!("  Records extracted: {}", stats.total_records);
    println!();

    println!("Sites:");
    for site in &stats.sites {
        println!(
            "  {}: {} pages, {} records ({})",
            site.entry_url, site.pages_fetched, site.records, site.stop
        );
    }
    println!();

    let failed: Vec<_> = stats.failed_sites().collect();
    if !failed.is_empty() {
        println!("Failures ({}):", failed.len());
        for site in failed {
            println!("  - {}: {}", site.entry_url, site.stop);
        }
        println!();
    }

    let success_rate = if stats.total_sites > 0 {
        (stats.completed_sites as f64 / stats.total_sites as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} sites crawled without errors)",
        success_rate, stats.completed_sites, stats.total_sites
    );
}
