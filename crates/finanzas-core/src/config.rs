//! Client configuration
//!
//! Loaded from TOML with per-field defaults, then overridden from the
//! environment (`FINANZAS_API_URL`, `FINANZAS_STORAGE`).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::api_url`]
pub const ENV_API_URL: &str = "FINANZAS_API_URL";
/// Environment variable overriding [`SessionConfig::storage_path`]
pub const ENV_STORAGE: &str = "FINANZAS_STORAGE";

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Versioned base URL of the REST API
    pub api_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// GET cache
    pub cache: CacheConfig,
    /// Session / redirect behaviour
    pub session: SessionConfig,
    /// Entity stores
    pub stores: StoreConfig,
    /// Update poller
    pub updates: UpdateConfig,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// With storage file
    #[inline]
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session.storage_path = Some(path.into());
        self
    }

    /// With GET cache switched on or off
    #[inline]
    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    /// Parse TOML. Missing keys take their defaults.
    ///
    /// # Errors
    /// Malformed TOML or an unusable value.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, then apply environment overrides
    ///
    /// # Errors
    /// IO failure, malformed TOML or an unusable value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env();
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `FINANZAS_*` overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_STORAGE).ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, storage: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            tracing::info!("{} set, using API at {}", ENV_API_URL, url);
            self.api_url = url;
        }
        if let Some(path) = storage.filter(|p| !p.trim().is_empty()) {
            self.session.storage_path = Some(PathBuf::from(path));
        }
    }

    /// Reject values the client cannot work with
    ///
    /// # Errors
    /// First offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::invalid("api_url", "must not be empty"));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::invalid("api_url", "must be an http(s) URL"));
        }
        if self.cache.max_age_secs < self.cache.fresh_secs {
            return Err(ConfigError::invalid(
                "cache.max_age_secs",
                "must be at least cache.fresh_secs",
            ));
        }
        if self.stores.page_size == 0 {
            return Err(ConfigError::invalid("stores.page_size", "must be positive"));
        }
        Ok(())
    }

    /// Per-request timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api/v1".to_string(),
            request_timeout_secs: 30,
            cache: CacheConfig::default(),
            session: SessionConfig::default(),
            stores: StoreConfig::default(),
            updates: UpdateConfig::default(),
        }
    }
}

/// GET cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether the cache interceptor is composed into the chain
    pub enabled: bool,
    /// Age below which a cached response is served
    pub fresh_secs: u64,
    /// Age above which the sweep evicts an entry
    pub max_age_secs: u64,
    /// Sweep period
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    /// Freshness window
    #[inline]
    #[must_use]
    pub fn fresh(&self) -> Duration {
        Duration::from_secs(self.fresh_secs)
    }

    /// Eviction age
    #[inline]
    #[must_use]
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    /// Sweep period
    #[inline]
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fresh_secs: 30,
            max_age_secs: 60,
            sweep_interval_secs: 60,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Window during which further 401s do not redirect again
    pub redirect_cooldown_ms: u64,
    /// Login page
    pub login_route: String,
    /// Page shown on role rejection
    pub access_denied_route: String,
    /// File holding cookie and local items; in-memory when absent
    pub storage_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Redirect cooldown
    #[inline]
    #[must_use]
    pub fn redirect_cooldown(&self) -> Duration {
        Duration::from_millis(self.redirect_cooldown_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            redirect_cooldown_ms: 1000,
            login_route: "/auth/login".to_string(),
            access_denied_route: "/access-denied".to_string(),
            storage_path: None,
        }
    }
}

/// Entity store settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Quiet period before a search is sent
    pub search_debounce_ms: u64,
    /// Restore optimistically deleted items when the server call fails
    pub rollback_failed_delete: bool,
    /// Default page size
    pub page_size: u32,
}

impl StoreConfig {
    /// Search debounce
    #[inline]
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            rollback_failed_delete: true,
            page_size: 10,
        }
    }
}

/// Update poller settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Whether the poller runs
    pub enabled: bool,
    /// Poll period
    pub poll_interval_secs: u64,
    /// Path returning `{"version": "..."}`
    pub version_path: String,
}

impl UpdateConfig {
    /// Poll period
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 3600,
            version_path: "/version".to_string(),
        }
    }
}
