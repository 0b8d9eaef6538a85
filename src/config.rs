//! Runtime configuration read from the process environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BackofficeError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

const ENV_BASE_URL: &str = "POS_API_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "POS_API_TIMEOUT_SECS";
const ENV_PAGE_SIZE: &str = "POS_PAGE_SIZE";
const ENV_SEARCH_DEBOUNCE_MS: &str = "POS_SEARCH_DEBOUNCE_MS";
const ENV_LOG_DIR: &str = "POS_LOG_DIR";

#[derive(Debug, Clone)]
pub struct BackofficeConfig {
    /// API root including the `/api` prefix, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Initial page size for new list controllers.
    pub page_size: u32,
    /// Quiet period the auto-refresh task waits before fetching.
    pub search_debounce: Duration,
    /// When set, logs are also written to daily files in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for BackofficeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            log_dir: None,
        }
    }
}

impl BackofficeConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = env_value(ENV_BASE_URL)
            .map(|url| normalize_base_url(&url))
            .unwrap_or(defaults.base_url);

        let request_timeout = match env_value(ENV_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(parse_positive(ENV_TIMEOUT_SECS, &raw)?),
            None => defaults.request_timeout,
        };
        let page_size = match env_value(ENV_PAGE_SIZE) {
            Some(raw) => {
                let size = parse_positive(ENV_PAGE_SIZE, &raw)?;
                u32::try_from(size).map_err(|_| {
                    BackofficeError::Config(format!("{ENV_PAGE_SIZE} is out of range: {raw}"))
                })?
            }
            None => defaults.page_size,
        };
        let search_debounce = match env_value(ENV_SEARCH_DEBOUNCE_MS) {
            Some(raw) => Duration::from_millis(raw.parse::<u64>().map_err(|_| {
                BackofficeError::Config(format!("{ENV_SEARCH_DEBOUNCE_MS} is not a number: {raw}"))
            })?),
            None => defaults.search_debounce,
        };

        Ok(Self {
            base_url,
            request_timeout,
            page_size,
            search_debounce,
            log_dir: env_value(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = normalize_base_url(url);
        self
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(BackofficeError::Config(format!(
            "{key} must be a positive integer, got {raw:?}"
        ))),
    }
}

/// Normalise the API base URL:
/// - ensure a scheme is present (https, or http for localhost)
/// - strip trailing slashes
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    while url.ends_with('/') {
        url.pop();
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            ENV_BASE_URL,
            ENV_TIMEOUT_SECS,
            ENV_PAGE_SIZE,
            ENV_SEARCH_DEBOUNCE_MS,
            ENV_LOG_DIR,
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn normalize_adds_scheme_and_strips_slashes() {
        assert_eq!(
            normalize_base_url("localhost:8080/api/"),
            "http://localhost:8080/api"
        );
        assert_eq!(
            normalize_base_url("  pos.example.com/api//"),
            "https://pos.example.com/api"
        );
        assert_eq!(
            normalize_base_url("http://10.0.0.5:8080/api"),
            "http://10.0.0.5:8080/api"
        );
    }

    #[test]
    #[serial]
    fn from_env_uses_defaults_when_unset() {
        clear_env();
        let config = BackofficeConfig::from_env().expect("defaults are valid");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert!(config.log_dir.is_none());
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        clear_env();
        std::env::set_var(ENV_BASE_URL, "backoffice.example.com/api/");
        std::env::set_var(ENV_PAGE_SIZE, "25");
        std::env::set_var(ENV_SEARCH_DEBOUNCE_MS, "0");
        std::env::set_var(ENV_LOG_DIR, "/tmp/pos-logs");

        let config = BackofficeConfig::from_env().expect("overrides are valid");
        clear_env();

        assert_eq!(config.base_url, "https://backoffice.example.com/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.search_debounce, Duration::ZERO);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/pos-logs")));
    }

    #[test]
    #[serial]
    fn from_env_rejects_zero_page_size() {
        clear_env();
        std::env::set_var(ENV_PAGE_SIZE, "0");
        let err = BackofficeConfig::from_env().expect_err("zero page size is invalid");
        clear_env();
        assert!(matches!(err, BackofficeError::Config(_)));
    }
}
