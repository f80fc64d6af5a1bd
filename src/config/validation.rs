use crate::config::schema::{SiteSpec, AUTHOR_FIELD, QUOTE_FIELD, TAGS_FIELD};
use crate::config::types::{Config, HttpConfig, ParsingRules, SiteConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_output_file(&config.output_file)?;
    validate_http_config(&config.http)?;
    for (index, site) in config.sites.iter().enumerate() {
        validate_site(index, site)?;
    }
    Ok(())
}

/// Validates the output path
fn validate_output_file(path: &str) -> Result<(), ConfigError> {
    if path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_file cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates HTTP transport configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(&config.user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user_agent is not a valid header value: {:?}",
            config.user_agent
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates one site entry, including that all of its selectors compile
///
/// The compiled spec is discarded: `Config` stays plain deserialized data and
/// `Config::site_specs` compiles again when a run starts. Compiling here
/// means a bad selector is reported at load time, before any fetch.
fn validate_site(index: usize, site: &SiteConfig) -> Result<(), ConfigError> {
    if site.url.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "sites[{}]: url cannot be empty",
            index
        )));
    }

    if site.max_pages == Some(0) {
        return Err(ConfigError::Validation(format!(
            "sites[{}]: max_pages must be >= 1 when set",
            index
        )));
    }

    validate_field_names(index, &site.parsing_rules)?;

    SiteSpec::from_config(site)?;

    Ok(())
}

/// Extra field names must not shadow the built-in ones or each other
fn validate_field_names(index: usize, rules: &ParsingRules) -> Result<(), ConfigError> {
    let mut seen: HashSet<&str> = [QUOTE_FIELD, AUTHOR_FIELD, TAGS_FIELD].into_iter().collect();

    for name in rules.fields.keys().chain(rules.lists.keys()) {
        if name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "sites[{}]: field names cannot be empty",
                index
            )));
        }

        if !seen.insert(name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "sites[{}]: field '{}' is defined more than once",
                index, name
            )));
        }
    }

    Ok(())
}
