use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::domain::normalize_domain;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_BASE_URL: &str = "https://www.similarweb.com/website";
pub const DEFAULT_TIMEOUT_SECS: f64 = 15.0;
pub const DEFAULT_MAX_WORKERS: u32 = 5;

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,

    #[serde(default = "default_timeout")]
    #[validate(range(min = 0.001))]
    pub request_timeout_seconds: f64,

    #[serde(default = "default_max_workers")]
    #[validate(range(min = 1))]
    pub max_workers: u32,

    #[serde(rename = "similarwebBaseUrl", default = "default_base_url")]
    #[validate(length(min = 1))]
    pub base_url: String,

    /// Pins `snapshotDate` for every record of the run (YYYY-MM-DD).
    #[serde(default)]
    #[validate(custom = "validate_snapshot_date")]
    pub snapshot_date: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_seconds: default_timeout(),
            max_workers: default_max_workers(),
            base_url: default_base_url(),
            snapshot_date: None,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_timeout_seconds)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }
}

fn validate_snapshot_date(value: &str) -> Result<(), ValidationError> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::new("snapshot_date_format"))
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_workers() -> u32 {
    DEFAULT_MAX_WORKERS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Per-run scraping configuration, shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Metrics page prefix, without trailing slash.
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    platform_marker: String,
}

impl ScraperConfig {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Self {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let platform_marker = normalize_domain(&base_url);
        Self {
            base_url,
            user_agent: user_agent.to_string(),
            timeout,
            platform_marker,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.base_url, &settings.user_agent, settings.timeout())
    }

    /// Bare host of the metrics platform; targets containing it are already
    /// page URLs.
    pub fn platform_marker(&self) -> &str {
        &self.platform_marker
    }
}
