//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use scraper::Selector;
use url::Url;

/// Maximum number of concurrent page downloads.
const MAX_CONCURRENCY: usize = 64;

/// Maximum attempts for any retry policy.
const MAX_ATTEMPTS: u32 = 100;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    parse_title_url(config.title.url.as_deref())?;
    validate_concurrency(config.download.concurrency)?;
    validate_attempts("retry.page_attempts", config.retry.page_attempts)?;
    validate_attempts("retry.chapter_attempts", config.retry.chapter_attempts)?;
    validate_backoff(config.retry.page_base_delay_ms, config.retry.page_max_delay_ms)?;
    validate_selector("site.title_selector", &config.site.title_selector)?;
    validate_selector("site.chapter_selector", &config.site.chapter_selector)?;
    validate_compression_level(config.archive.compression_level)?;
    validate_user_agent(&config.http.user_agent)?;

    if config.http.timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            field: "http.timeout_secs".to_string(),
            message: "Timeout must be greater than zero".to_string(),
        });
    }

    Ok(())
}

/// Parse and check the title root URL.
pub fn parse_title_url(input: Option<&str>) -> Result<Url> {
    let input = input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MissingConfig("title url (positional URL or [title] url)".into()))?;

    let url = Url::parse(input).map_err(|e| Error::ConfigValidation {
        field: "title.url".to_string(),
        message: format!("'{}' is not a valid URL: {}", input, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "title.url".to_string(),
            message: format!("Unsupported scheme '{}', expected http or https", url.scheme()),
        });
    }

    if url.host_str().is_none() {
        return Err(Error::ConfigValidation {
            field: "title.url".to_string(),
            message: format!("'{}' has no host", input),
        });
    }

    Ok(url)
}

/// Validate the download concurrency.
pub fn validate_concurrency(concurrency: usize) -> Result<()> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(Error::ConfigValidation {
            field: "download.concurrency".to_string(),
            message: format!(
                "Concurrency must be between 1 and {} (got {})",
                MAX_CONCURRENCY, concurrency
            ),
        });
    }
    Ok(())
}

/// Validate a retry attempt count.
pub fn validate_attempts(field: &str, attempts: u32) -> Result<()> {
    if attempts == 0 || attempts > MAX_ATTEMPTS {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "Attempts must be between 1 and {} (got {})",
                MAX_ATTEMPTS, attempts
            ),
        });
    }
    Ok(())
}

fn validate_backoff(base_ms: u64, max_ms: u64) -> Result<()> {
    if base_ms > max_ms {
        return Err(Error::ConfigValidation {
            field: "retry.page_base_delay_ms".to_string(),
            message: format!(
                "Base delay ({} ms) exceeds maximum delay ({} ms)",
                base_ms, max_ms
            ),
        });
    }
    Ok(())
}

/// Validate a CSS selector.
pub fn validate_selector(field: &str, selector: &str) -> Result<()> {
    Selector::parse(selector).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("Invalid selector '{}': {:?}", selector, e),
    })?;
    Ok(())
}

/// Validate the deflate compression level.
pub fn validate_compression_level(level: i32) -> Result<()> {
    if !(0..=9).contains(&level) {
        return Err(Error::ConfigValidation {
            field: "archive.compression_level".to_string(),
            message: format!("Level must be between 0 and 9 (got {})", level),
        });
    }
    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("http.user_agent".to_string()));
    }
    Ok(())
}
