//! Configuration module for Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and compiling each site's selectors into a [`SiteSpec`].
//!
//! # Example
//!
//! ```no_run
//! use harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Records will be written to: {}", config.output_file);
//! ```

mod parser;
mod schema;
mod types;
mod validation;

// Re-export types
pub use schema::{
    compile_selector, FieldSchema, FieldSelector, SiteSpec, AUTHOR_FIELD, QUOTE_FIELD, TAGS_FIELD,
};
pub use types::{Config, HttpConfig, ParsingRules, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
