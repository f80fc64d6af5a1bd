use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the JSON file the collected records are written to
    pub output_file: String,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!("harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// One configured crawl target
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Entry URL, the first page fetched for this site
    pub url: String,

    /// Selectors describing how records are extracted
    pub parsing_rules: ParsingRules,

    /// Selector for the "next page" link; pagination is disabled when unset
    #[serde(default)]
    pub next_page_selector: Option<String>,

    /// Prefix prepended verbatim to next-page hrefs
    #[serde(default)]
    pub base_url: String,

    /// Upper bound on pages fetched for this site; unbounded when unset
    #[serde(default)]
    pub max_pages: Option<usize>,
}

/// Selector strings for a site's records
#[derive(Debug, Clone, Deserialize)]
pub struct ParsingRules {
    /// Selects each repeated record container
    pub quote_block: String,

    #[serde(default)]
    pub quote: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Multi-valued: every match inside a block is kept
    #[serde(default)]
    pub tags: Option<String>,

    /// Additional single-valued fields, keyed by output name
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Additional multi-valued fields, keyed by output name
    #[serde(default)]
    pub lists: BTreeMap<String, String>,
}
