//! Runtime configuration.
//!
//! Settings come from environment variables; the CLI layers its own flags on
//! top through [`ConfigOverrides`]. The base URL may also fall back to the
//! value remembered in the credential store from the last login.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

pub const ENV_BASE_URL: &str = "RESTRO_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "RESTRO_API_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "RESTRO_CACHE_TTL_SECS";
pub const ENV_PAGE_SIZE: &str = "RESTRO_PAGE_SIZE";
pub const ENV_LOG_DIR: &str = "RESTRO_LOG_DIR";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub page_size: usize,
    pub log_dir: Option<PathBuf>,
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<usize>,
    pub log_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the API base URL:
/// - ensure a scheme is present (https, or http for localhost)
/// - strip trailing slashes
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();
    if url.is_empty() {
        return url;
    }

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

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Build from the process environment.
    pub fn from_env(overrides: ConfigOverrides, remembered_url: Option<String>) -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides, remembered_url)
    }

    /// Build from an arbitrary key lookup. Precedence for every setting is
    /// override, then environment, then default.
    pub fn from_lookup<F>(
        lookup: F,
        overrides: ConfigOverrides,
        remembered_url: Option<String>,
    ) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = overrides
            .base_url
            .filter(|v| !v.trim().is_empty())
            .or_else(|| non_empty(ENV_BASE_URL))
            .or(remembered_url.filter(|v| !v.trim().is_empty()))
            .map(|v| normalize_base_url(&v))
            .ok_or_else(|| {
                ApiError::Config(format!(
                    "API base URL is not defined; set {ENV_BASE_URL} or pass --base-url"
                ))
            })?;

        let timeout_secs = match overrides.timeout_secs {
            Some(v) => v,
            None => parse_or(non_empty(ENV_TIMEOUT_SECS), ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?,
        };
        let cache_ttl_secs =
            parse_or(non_empty(ENV_CACHE_TTL_SECS), ENV_CACHE_TTL_SECS, DEFAULT_CACHE_TTL_SECS)?;
        let page_size = match overrides.page_size {
            Some(v) => v,
            None => parse_or(non_empty(ENV_PAGE_SIZE), ENV_PAGE_SIZE, DEFAULT_PAGE_SIZE)?,
        };
        if page_size == 0 {
            return Err(ApiError::Config("page size must be at least 1".into()));
        }

        let log_dir = overrides
            .log_dir
            .or_else(|| non_empty(ENV_LOG_DIR).map(PathBuf::from));

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            page_size,
            log_dir,
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> ApiResult<T> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|_| ApiError::Config(format!("{key} has an invalid value: {v}"))),
        None => Ok(default),
    }
}
