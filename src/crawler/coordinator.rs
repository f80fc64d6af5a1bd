//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the per-site crawl loop and the outer loop over all
//! configured sites:
//! - Following "next page" links until none is left
//! - Ending a site's crawl on the first failed fetch
//! - Isolating sites from each other's failures
//! - Concatenating records in site, page, then document order

use crate::config::SiteSpec;
use crate::crawler::events::CrawlEvents;
use crate::crawler::extractor::{next_page_from_document, records_from_document, Record};
use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::state::CrawlPhase;
use futures::FutureExt;
use scraper::Html;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

/// Why a site's crawl stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// No next page was resolved (or pagination is not configured)
    LastPage,

    /// A page could not be fetched
    FetchFailed(FetchError),

    /// The configured page limit was reached
    PageLimit(usize),

    /// The crawl panicked; records from that site are lost
    Aborted(String),
}

impl StopReason {
    /// Returns true if the site ended without an error
    pub fn is_success(&self) -> bool {
        matches!(self, Self::LastPage | Self::PageLimit(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastPage => write!(f, "last page reached"),
            Self::FetchFailed(error) => write!(f, "fetch failed: {}", error),
            Self::PageLimit(max) => write!(f, "page limit of {} reached", max),
            Self::Aborted(message) => write!(f, "aborted: {}", message),
        }
    }
}

/// Per-site outcome, kept alongside the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub entry_url: String,
    pub pages_fetched: usize,
    pub records: usize,
    pub stop: StopReason,
}

/// Records and summary of one site's crawl
#[derive(Debug, Clone)]
pub struct SiteCrawl {
    pub records: Vec<Record>,
    pub summary: SiteSummary,
}

impl SiteCrawl {
    fn aborted(site: &SiteSpec, message: String) -> Self {
        Self {
            records: Vec::new(),
            summary: SiteSummary {
                entry_url: site.entry_url.clone(),
                pages_fetched: 0,
                records: 0,
                stop: StopReason::Aborted(message),
            },
        }
    }
}

/// Output of a whole run
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// All records, in site, page, then document order
    pub records: Vec<Record>,

    /// One entry per configured site, in configuration order
    pub sites: Vec<SiteSummary>,
}

impl CrawlResult {
    fn push(&mut self, crawl: SiteCrawl) {
        self.records.extend(crawl.records);
        self.sites.push(crawl.summary);
    }

    /// Total number of pages fetched across sites
    pub fn pages_fetched(&self) -> usize {
        self.sites.iter().map(|s| s.pages_fetched).sum()
    }
}

/// What one page contributed to the crawl
struct PageOutcome {
    records: Vec<Record>,
    next_url: Option<String>,
}

/// Drives the fetch → extract → resolve loop
///
/// Holds the single fetcher shared by every site of the run; one page is
/// fetched at a time.
pub struct SiteCrawler<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    events: &'a dyn CrawlEvents,
}

impl<'a, F: PageFetcher + ?Sized> SiteCrawler<'a, F> {
    /// Creates a crawler over the given fetcher, reporting to `events`
    pub fn new(fetcher: &'a F, events: &'a dyn CrawlEvents) -> Self {
        Self { fetcher, events }
    }

    /// Crawls one site from its entry URL until no next page is found
    ///
    /// A failed fetch ends the site's crawl but keeps the records of the
    /// pages already processed. The next page is resolved even when a page
    /// has no records.
    pub async fn crawl_site(&self, site: &SiteSpec) -> SiteCrawl {
        let mut records = Vec::new();
        let mut pages_fetched = 0;
        let mut phase = CrawlPhase::Fetching;
        let mut url = site.entry_url.clone();

        let stop = loop {
            let content = match self.fetcher.fetch(&url).await {
                Ok(content) => content,
                Err(error) => {
                    self.events.fetch_failed(&error);
                    self.advance(&url, &mut phase, CrawlPhase::Done);
                    break StopReason::FetchFailed(error);
                }
            };
            pages_fetched += 1;
            self.events.page_fetched(&url, content.len());

            let page = self.process_page(&url, &content, site, &mut phase);
            records.extend(page.records);

            match page.next_url {
                Some(_) if site.max_pages.is_some_and(|max| pages_fetched >= max) => {
                    self.advance(&url, &mut phase, CrawlPhase::Done);
                    break StopReason::PageLimit(pages_fetched);
                }
                Some(next_url) => {
                    self.advance(&url, &mut phase, CrawlPhase::Fetching);
                    url = next_url;
                }
                None => {
                    self.advance(&url, &mut phase, CrawlPhase::Done);
                    break StopReason::LastPage;
                }
            }
        };

        let summary = SiteSummary {
            entry_url: site.entry_url.clone(),
            pages_fetched,
            records: records.len(),
            stop,
        };
        self.events.site_finished(&summary);

        SiteCrawl { records, summary }
    }

    /// Crawls every site in order and concatenates their records
    ///
    /// Each site runs inside an unwind boundary: a panic while crawling one
    /// site is reported and the remaining sites are still crawled.
    pub async fn crawl_all(&self, sites: &[SiteSpec]) -> CrawlResult {
        let mut result = CrawlResult::default();

        for site in sites {
            let crawl = match AssertUnwindSafe(self.crawl_site(site))
                .catch_unwind()
                .await
            {
                Ok(crawl) => crawl,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    self.events.site_aborted(&site.entry_url, &message);
                    SiteCrawl::aborted(site, message)
                }
            };
            result.push(crawl);
        }

        result
    }

    // Parsed documents are not `Send`, so parsing stays out of the async loop.
    fn process_page(
        &self,
        url: &str,
        content: &str,
        site: &SiteSpec,
        phase: &mut CrawlPhase,
    ) -> PageOutcome {
        let document = Html::parse_document(content);

        self.advance(url, phase, CrawlPhase::Extracting);
        let records = records_from_document(&document, &site.schema);
        self.events.page_extracted(url, records.len());

        self.advance(url, phase, CrawlPhase::Resolving);
        let next_url = site
            .next_page
            .as_ref()
            .and_then(|selector| next_page_from_document(&document, selector, &site.base_url));

        PageOutcome { records, next_url }
    }

    fn advance(&self, url: &str, phase: &mut CrawlPhase, next: CrawlPhase) {
        debug_assert!(
            phase.can_transition_to(next),
            "invalid crawl transition {} -> {}",
            phase,
            next
        );
        self.events.phase_changed(url, *phase, next);
        *phase = next;
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
