//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoints and request identity
    #[serde(default)]
    pub api: ApiConfig,

    /// Detail classification and retry policy
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Polling loop pacing
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Progress file location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        Url::parse(&self.api.catalog_url)
            .map_err(|e| AppError::validation(format!("api.catalog_url: {e}")))?;
        Url::parse(&self.api.detail_url)
            .map_err(|e| AppError::validation(format!("api.detail_url: {e}")))?;
        if self.api.detail_id_param.trim().is_empty() {
            return Err(AppError::validation("api.detail_id_param is empty"));
        }
        if self.classifier.target_type.trim().is_empty() {
            return Err(AppError::validation("classifier.target_type is empty"));
        }
        if self.classifier.max_attempts == 0 {
            return Err(AppError::validation("classifier.max_attempts must be > 0"));
        }
        if self.classifier.attempt_timeout_secs == 0 {
            return Err(AppError::validation(
                "classifier.attempt_timeout_secs must be > 0",
            ));
        }
        if self.harvest.failure_cooldown() <= self.classifier.retry_backoff() {
            return Err(AppError::validation(
                "harvest.failure_cooldown_secs must be longer than classifier.retry_backoff_ms",
            ));
        }
        if self.storage.progress_file.trim().is_empty() {
            return Err(AppError::validation("storage.progress_file is empty"));
        }
        Ok(())
    }
}

/// Remote endpoints and the identity sent with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Full app catalog endpoint
    #[serde(default = "defaults::catalog_url")]
    pub catalog_url: String,

    /// Per-app detail endpoint, without the id query
    #[serde(default = "defaults::detail_url")]
    pub detail_url: String,

    /// Query parameter carrying the app id
    #[serde(default = "defaults::detail_id_param")]
    pub detail_id_param: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            catalog_url: defaults::catalog_url(),
            detail_url: defaults::detail_url(),
            detail_id_param: defaults::detail_id_param(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Detail classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Item type that gets accepted
    #[serde(default = "defaults::target_type")]
    pub target_type: String,

    /// Attempts per candidate, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Timeout applied to each attempt independently
    #[serde(default = "defaults::attempt_timeout")]
    pub attempt_timeout_secs: u64,

    /// Pause between attempts in milliseconds
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Treat a payload that does not report success as a failed attempt.
    /// When false it is classified as skipped right away.
    #[serde(default = "defaults::retry_unsuccessful")]
    pub retry_unsuccessful: bool,
}

impl ClassifierConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            target_type: defaults::target_type(),
            max_attempts: defaults::max_attempts(),
            attempt_timeout_secs: defaults::attempt_timeout(),
            retry_backoff_ms: defaults::retry_backoff(),
            retry_unsuccessful: defaults::retry_unsuccessful(),
        }
    }
}

/// Polling loop pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Delay after every processed candidate in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Delay after a candidate exhausted its attempts, in seconds
    #[serde(default = "defaults::failure_cooldown")]
    pub failure_cooldown_secs: u64,

    /// Stop after this many processed candidates (unbounded when unset)
    #[serde(default)]
    pub max_processed: Option<usize>,
}

impl HarvestConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn failure_cooldown(&self) -> Duration {
        Duration::from_secs(self.failure_cooldown_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: defaults::request_delay(),
            failure_cooldown_secs: defaults::failure_cooldown(),
            max_processed: None,
        }
    }
}

/// Where accepted items are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON progress file
    #[serde(default = "defaults::progress_file")]
    pub progress_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            progress_file: defaults::progress_file(),
        }
    }
}

mod defaults {
    // Api defaults
    pub fn catalog_url() -> String {
        "https://api.steampowered.com/ISteamApps/GetAppList/v2/".into()
    }
    pub fn detail_url() -> String {
        "https://store.steampowered.com/api/appdetails".into()
    }
    pub fn detail_id_param() -> String {
        "appids".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; SteamScraper/1.0)".into()
    }

    // Classifier defaults
    pub fn target_type() -> String {
        "game".into()
    }
    pub fn max_attempts() -> u32 {
        2
    }
    pub fn attempt_timeout() -> u64 {
        10
    }
    pub fn retry_backoff() -> u64 {
        1000
    }
    pub fn retry_unsuccessful() -> bool {
        true
    }

    // Harvest defaults
    pub fn request_delay() -> u64 {
        1100
    }
    pub fn failure_cooldown() -> u64 {
        30
    }

    // Storage defaults
    pub fn progress_file() -> String {
        "games.json".into()
    }
}
