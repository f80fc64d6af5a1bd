//! Crawl event reporting
//!
//! The crawler never logs directly. It reports what happens to a
//! [`CrawlEvents`] implementation handed to it, which keeps the crawl loop
//! testable without any global logging setup.

use crate::crawler::coordinator::SiteSummary;
use crate::crawler::fetcher::FetchError;
use crate::state::CrawlPhase;

/// Receiver for progress and failure notifications from the crawler
///
/// Every method has an empty default, so implementors only override what
/// they care about.
pub trait CrawlEvents: Send + Sync {
    /// A page body was retrieved
    fn page_fetched(&self, _url: &str, _bytes: usize) {}

    /// Records were extracted from a fetched page
    fn page_extracted(&self, _url: &str, _records: usize) {}

    /// A page could not be retrieved; the site's crawl ends here
    fn fetch_failed(&self, _error: &FetchError) {}

    /// The crawl loop of a site moved to another phase
    fn phase_changed(&self, _url: &str, _from: CrawlPhase, _to: CrawlPhase) {}

    /// A site finished crawling, whatever the reason
    fn site_finished(&self, _summary: &SiteSummary) {}

    /// A site's crawl panicked and was abandoned
    fn site_aborted(&self, _entry_url: &str, _message: &str) {}
}

/// Reports crawl events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl CrawlEvents for TracingEvents {
    fn page_fetched(&self, url: &str, bytes: usize) {
        tracing::info!("Fetched page {} ({} bytes)", url, bytes);
    }

    fn page_extracted(&self, url: &str, records: usize) {
        tracing::debug!("Extracted {} records from {}", records, url);
    }

    fn fetch_failed(&self, error: &FetchError) {
        tracing::error!("Failed to fetch {}: {}", error.url(), error);
    }

    fn phase_changed(&self, url: &str, from: CrawlPhase, to: CrawlPhase) {
        tracing::trace!("{}: {} -> {}", url, from, to);
    }

    fn site_finished(&self, summary: &SiteSummary) {
        tracing::info!(
            "Finished {}: {} pages, {} records ({})",
            summary.entry_url,
            summary.pages_fetched,
            summary.records,
            summary.stop
        );
    }

    fn site_aborted(&self, entry_url: &str, message: &str) {
        tracing::error!("Crawl of {} aborted: {}", entry_url, message);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl CrawlEvents for NoopEvents {}
