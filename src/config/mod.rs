use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::cache::CacheOptions;
use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "DUTYING_API_BASE_URL";
pub const CONFIG_DIR_VAR: &str = "DUTYING_ADMIN_CONFIG_DIR";

/// Page size used by the notice board when nothing overrides it
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL without a trailing slash
    pub api_base_url: String,
    pub config_dir: PathBuf,
    pub query: CacheOptions,
    pub page_size: u32,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// The base URL is mandatory; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(BASE_URL_VAR).ok_or(ConfigError::MissingBaseUrl)?;
        let api_base_url = parse_base_url(&raw)?;
        let config_dir = default_config_dir(&lookup)?;

        Ok(Self::defaults(api_base_url, config_dir).with_env_overrides(&lookup))
    }

    pub fn defaults(api_base_url: String, config_dir: PathBuf) -> Self {
        Self {
            api_base_url,
            config_dir,
            query: CacheOptions::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DUTYING_QUERY_STALE_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                self.query.stale_time = Duration::from_secs(secs);
            }
        }
        if let Some(v) = lookup("DUTYING_QUERY_RETRY") {
            self.query.retry = v.parse().unwrap_or(self.query.retry);
        }
        if let Some(v) = lookup("DUTYING_PAGE_SIZE") {
            self.page_size = v.parse().ok().filter(|n| *n > 0).unwrap_or(self.page_size);
        }

        self
    }
}

/// Validate an absolute http(s) URL and strip any trailing slash.
pub fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn default_config_dir<F>(lookup: &F) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(custom_dir) = lookup(CONFIG_DIR_VAR) {
        return Ok(PathBuf::from(custom_dir));
    }

    let home = lookup("HOME").ok_or_else(|| ConfigError::ConfigDir("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("dutying").join("admin"))
}
