//! Compiled site and field schemas
//!
//! Selector strings from the configuration file are parsed once, at load
//! time, into the structures the crawler works with.

use crate::config::types::{ParsingRules, SiteConfig};
use crate::{ConfigError, ConfigResult};
use scraper::Selector;

/// Output name of the primary text field
pub const QUOTE_FIELD: &str = "quote";

/// Output name of the attribution field
pub const AUTHOR_FIELD: &str = "author";

/// Output name of the multi-valued tag field
pub const TAGS_FIELD: &str = "tags";

/// A named field and the selector evaluated inside each record block
///
/// A field without a selector is still emitted, always empty.
#[derive(Debug, Clone)]
pub struct FieldSelector {
    pub name: String,
    pub selector: Option<Selector>,
}

/// Selectors defining how records are pulled out of a page
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Selects each repeated record container
    pub record_block: Selector,

    /// Single-valued fields, in output order
    pub scalars: Vec<FieldSelector>,

    /// Multi-valued fields, in output order
    pub lists: Vec<FieldSelector>,
}

impl FieldSchema {
    /// Compiles the parsing rules of one site
    ///
    /// `quote` and `author` always come first among the scalar fields and
    /// `tags` first among the list fields, followed by the extra fields in
    /// name order.
    pub fn from_rules(rules: &ParsingRules) -> ConfigResult<Self> {
        let record_block = compile_selector(&rules.quote_block)?;

        let mut scalars = vec![
            FieldSelector::compile(QUOTE_FIELD, rules.quote.as_deref())?,
            FieldSelector::compile(AUTHOR_FIELD, rules.author.as_deref())?,
        ];
        for (name, selector) in &rules.fields {
            scalars.push(FieldSelector::compile(name, Some(selector))?);
        }

        let mut lists = vec![FieldSelector::compile(TAGS_FIELD, rules.tags.as_deref())?];
        for (name, selector) in &rules.lists {
            lists.push(FieldSelector::compile(name, Some(selector))?);
        }

        Ok(Self {
            record_block,
            scalars,
            lists,
        })
    }
}

impl FieldSelector {
    fn compile(name: &str, selector: Option<&str>) -> ConfigResult<Self> {
        Ok(Self {
            name: name.to_string(),
            selector: selector.map(compile_selector).transpose()?,
        })
    }
}

/// One crawl target, ready to be crawled
#[derive(Debug, Clone)]
pub struct SiteSpec {
    pub entry_url: String,
    pub schema: FieldSchema,
    pub next_page: Option<Selector>,
    pub base_url: String,
    pub max_pages: Option<usize>,
}

impl SiteSpec {
    /// Builds a site spec from its configuration entry
    ///
    /// # Arguments
    ///
    /// * `site` - The site entry as read from the configuration file
    ///
    /// # Returns
    ///
    /// * `Ok(SiteSpec)` - All selectors compiled
    /// * `Err(ConfigError)` - A selector failed to parse
    pub fn from_config(site: &SiteConfig) -> ConfigResult<Self> {
        Ok(Self {
            entry_url: site.url.clone(),
            schema: FieldSchema::from_rules(&site.parsing_rules)?,
            next_page: site
                .next_page_selector
                .as_deref()
                .map(compile_selector)
                .transpose()?,
            base_url: site.base_url.clone(),
            max_pages: site.max_pages,
        })
    }
}

/// Parses a CSS selector, mapping failures to a configuration error
pub fn compile_selector(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
