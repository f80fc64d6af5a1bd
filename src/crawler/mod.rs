//! Crawler module for page fetching and record extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching, one attempt per page
//! - Record extraction and next-page resolution
//! - The per-site pagination loop and the outer loop over sites
//! - Event reporting for logging

mod coordinator;
mod events;
mod extractor;
mod fetcher;

pub use coordinator::{CrawlResult, SiteCrawl, SiteCrawler, SiteSummary, StopReason};
pub use events::{CrawlEvents, NoopEvents, TracingEvents};
pub use extractor::{
    extract_records, next_page_from_document, records_from_document, resolve_next_page, Record,
};
pub use fetcher::{build_http_client, fetch_url, FetchError, HttpFetcher, PageFetcher};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl operation, logging through `tracing`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Compile every site's selectors (configuration errors abort here)
/// 2. Build the HTTP client, once for the whole run
/// 3. Crawl each site in configuration order
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(CrawlResult)` - All records collected, possibly none
/// * `Err(HarvestError)` - The configuration or HTTP client was unusable
pub async fn run_harvest(config: &Config) -> Result<CrawlResult, HarvestError> {
    run_harvest_with(config, &TracingEvents).await
}

/// Same as [`run_harvest`], reporting to the given event sink
pub async fn run_harvest_with(
    config: &Config,
    events: &dyn CrawlEvents,
) -> Result<CrawlResult, HarvestError> {
    let sites = config.site_specs()?;
    let fetcher = HttpFetcher::new(&config.http)?;

    let crawler = SiteCrawler::new(&fetcher, events);
    Ok(crawler.crawl_all(&sites).await)
}
