//! State module for tracking crawl progress
//!
//! - `CrawlPhase`: where a site's fetch → extract → resolve loop currently is

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
