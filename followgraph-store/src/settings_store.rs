//! User preferences store.
//!
//! Settings are loaded once per process and written back on request.

use followgraph_fetch::{DelayPolicy, FetchSettings, ThrottlePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// Smallest wait added past a reported reset time.
pub const MIN_RESET_BUFFER_SECS: u64 = 5;

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ========================================================================
    // Account
    // ========================================================================
    /// REST API root.
    pub api_base_url: String,

    /// Acting account. `GITHUB_USERNAME` takes precedence.
    pub username: Option<String>,

    // ========================================================================
    // Fetching
    // ========================================================================
    /// Relationship cache time-to-live in seconds.
    pub cache_ttl_secs: u64,

    /// Page size for list endpoints.
    pub per_page: u32,

    /// HTTP timeout in seconds.
    pub request_timeout_secs: u64,

    // ========================================================================
    // Pacing
    // ========================================================================
    /// Remaining quota at or below which the long delay applies.
    pub low_water_threshold: u32,

    /// Remaining quota at or below which the medium delay applies.
    pub secondary_threshold: u32,

    /// Delay near quota exhaustion, in milliseconds.
    pub long_delay_ms: u64,

    /// Delay when quota is getting low, in milliseconds.
    pub medium_delay_ms: u64,

    /// Delay in normal operation, in milliseconds.
    pub short_delay_ms: u64,

    /// Seconds added to the reset time after a throttle.
    pub reset_buffer_secs: u64,

    /// Minimum throttle wait in seconds.
    pub min_reset_wait_secs: u64,

    /// Throttle retries on one call before giving up. Unset waits out
    /// throttling for as long as it lasts.
    pub max_throttle_retries: Option<u32>,

    // ========================================================================
    // Bulk Operations
    // ========================================================================
    /// Items between progress reports and quota checks.
    pub bulk_batch_size: usize,

    /// Cap on a low-quota pause, in seconds.
    pub max_low_quota_pause_secs: u64,

    /// Identities listed in a dry-run preview.
    pub dry_run_preview_limit: usize,

    // ========================================================================
    // Diagnostics
    // ========================================================================
    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: followgraph_fetch::DEFAULT_API_BASE_URL.to_string(),
            username: None,
            cache_ttl_secs: 300,
            per_page: 100,
            request_timeout_secs: 30,
            low_water_threshold: 100,
            secondary_threshold: 1000,
            long_delay_ms: 2000,
            medium_delay_ms: 1000,
            short_delay_ms: 200,
            reset_buffer_secs: 5,
            min_reset_wait_secs: 1,
            max_throttle_retries: None,
            bulk_batch_size: 10,
            max_low_quota_pause_secs: 30,
            dry_run_preview_limit: 20,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Relationship cache time-to-live.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Cap on a low-quota pause.
    pub fn max_low_quota_pause(&self) -> Duration {
        Duration::from_secs(self.max_low_quota_pause_secs)
    }

    /// Pre-request pacing policy.
    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy {
            low_water: self.low_water_threshold,
            secondary: self.secondary_threshold.max(self.low_water_threshold),
            long_delay: Duration::from_millis(self.long_delay_ms),
            medium_delay: Duration::from_millis(self.medium_delay_ms),
            short_delay: Duration::from_millis(self.short_delay_ms),
        }
    }

    /// Throttle wait policy.
    pub fn throttle_policy(&self) -> ThrottlePolicy {
        ThrottlePolicy::new(self.max_throttle_retries)
            .with_reset_buffer(Duration::from_secs(self.reset_buffer_secs))
            .with_min_wait(Duration::from_secs(self.min_reset_wait_secs))
    }

    /// Settings for the API client.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            api_base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            per_page: self.per_page.clamp(1, 100),
            delay: self.delay_policy(),
            throttle: self.throttle_policy(),
        }
    }

    /// Checks values that would make the client misbehave.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(StoreError::Config("api_base_url is empty".into()));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(StoreError::Config(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        if self.bulk_batch_size == 0 {
            return Err(StoreError::Config("bulk_batch_size must be at least 1".into()));
        }
        if self.reset_buffer_secs < MIN_RESET_BUFFER_SECS {
            return Err(StoreError::Config(format!(
                "reset_buffer_secs must be at least {MIN_RESET_BUFFER_SECS}, got {}",
                self.reset_buffer_secs
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(StoreError::Config("request_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    Warn,
    /// Info level logging.
    #[default]
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings store with persistence.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store holding defaults, bound to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file's existence cannot be checked.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if tokio::fs::try_exists(&path).await? {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Restores defaults in memory.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.cache_ttl(), Duration::from_secs(300));
        assert_eq!(settings.bulk_batch_size, 10);
        assert_eq!(settings.dry_run_preview_limit, 20);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_policy_conversion() {
        let settings = Settings::default();
        let delay = settings.delay_policy();
        assert_eq!(delay, DelayPolicy::default());

        let throttle = settings.throttle_policy();
        assert_eq!(throttle, ThrottlePolicy::default());

        let fetch = settings.fetch_settings();
        assert_eq!(fetch.api_base_url, "https://api.github.com");
        assert_eq!(fetch.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_short_reset_buffer() {
        let settings = Settings {
            reset_buffer_secs: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(StoreError::Config(_))));

        let settings = Settings {
            reset_buffer_secs: MIN_RESET_BUFFER_SECS,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_throttle_cap_is_opt_in() {
        assert_eq!(Settings::default().throttle_policy().max_retries, None);

        let settings: Settings =
            serde_json::from_str(r#"{"max_throttle_retries": 4}"#).unwrap();
        assert_eq!(settings.throttle_policy().max_retries, Some(4));
    }

    #[test]
    fn test_validate_rejects_bad_page_size() {
        let settings = Settings {
            per_page: 500,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"username":"octocat","cache_ttl_secs":60}"#).unwrap();
        assert_eq!(settings.username.as_deref(), Some("octocat"));
        assert_eq!(settings.cache_ttl_secs, 60);
        assert_eq!(settings.per_page, 100);
        assert_eq!(settings.log_level, LogLevel::Info);
    }

    #[tokio::test]
    async fn test_update_and_reset() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        store.update(|s| s.username = Some("octocat".into())).await;
        assert_eq!(store.get().await.username.as_deref(), Some("octocat"));

        store.reset().await;
        assert_eq!(store.get().await, Settings::default());
    }
}
