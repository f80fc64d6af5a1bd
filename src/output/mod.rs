//! Output module for writing crawl results
//!
//! This module handles:
//! - Writing the collected records as a JSON document
//! - Summarising per-site crawl statistics

mod json;
pub mod stats;

pub use json::{format_records, save_records};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
