//! New-version detection
//!
//! [`UpdateWatcher`] polls the version endpoint. When the deployed version
//! differs from the running one it asks an [`UpdatePrompt`] and, on
//! acceptance, runs the reload hook. A declined version is not offered again.

use crate::error::AppError;
use finanzas_core::UpdateConfig;
use finanzas_http::ApiClient;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Question shown when a new version is ready
pub const UPDATE_QUESTION: &str = "Nueva versión disponible. ¿Cargar la nueva versión?";

/// Confirmation dialog for updates
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait UpdatePrompt: Send + Sync {
    /// Whether to switch from `current` to `available`
    fn confirm(&self, current: &str, available: &str) -> bool;
}

/// Action run once an update is accepted; receives the new version
pub type ReloadHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Outcome of one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// Deployed version equals the running one
    UpToDate,
    /// Same version the user already declined
    Dismissed(String),
    /// User declined the new version
    Declined(String),
    /// User accepted; the reload hook ran
    Applied(String),
}

/// Poller for `GET {version_path}`
pub struct UpdateWatcher {
    client: ApiClient,
    version_path: String,
    interval: Duration,
    current: String,
    prompt: Arc<dyn UpdatePrompt>,
    reload: ReloadHook,
    declined: Mutex<Option<String>>,
}

impl UpdateWatcher {
    /// Watcher for a client running `current_version`
    #[must_use]
    pub fn new(
        client: ApiClient,
        config: &UpdateConfig,
        current_version: impl Into<String>,
        prompt: Arc<dyn UpdatePrompt>,
        reload: ReloadHook,
    ) -> Self {
        Self {
            client,
            version_path: config.version_path.clone(),
            interval: config.poll_interval(),
            current: current_version.into(),
            prompt,
            reload,
            declined: Mutex::new(None),
        }
    }

    /// Running version
    #[inline]
    #[must_use]
    pub fn current_version(&self) -> &str {
        &self.current
    }

    /// Poll once
    ///
    /// # Errors
    /// Request failure, or a response carrying no version.
    pub async fn check(&self) -> Result<UpdateCheck, AppError> {
        let body = self.client.get_json(&self.version_path, Vec::new()).await?;
        let available =
            version_in(&body).ok_or_else(|| AppError::MissingVersion(self.version_path.clone()))?;

        if available == self.current {
            return Ok(UpdateCheck::UpToDate);
        }
        if self.declined.lock().as_deref() == Some(available.as_str()) {
            return Ok(UpdateCheck::Dismissed(available));
        }

        tracing::info!("Version {} available (running {})", available, self.current);
        if self.prompt.confirm(&self.current, &available) {
            (self.reload)(&available);
            Ok(UpdateCheck::Applied(available))
        } else {
            *self.declined.lock() = Some(available.clone());
            Ok(UpdateCheck::Declined(available))
        }
    }

    /// Poll every interval until an update is applied or the handle is aborted
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match self.check().await {
                    Ok(UpdateCheck::Applied(version)) => {
                        tracing::info!("Reloaded into version {}", version);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Update check failed: {}", e),
                }
            }
        })
    }
}

impl std::fmt::Debug for UpdateWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateWatcher")
            .field("version_path", &self.version_path)
            .field("interval", &self.interval)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// `version` at the top level or inside either envelope
fn version_in(body: &Value) -> Option<String> {
    ["/version", "/data/version", "/value/version"]
        .iter()
        .find_map(|pointer| body.pointer(pointer))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_lookup() {
        assert_eq!(version_in(&json!({ "version": "1.4.0" })).as_deref(), Some("1.4.0"));
        assert_eq!(version_in(&json!({ "data": { "version": "2" } })).as_deref(), Some("2"));
        assert_eq!(
            version_in(&json!({ "isSuccess": true, "value": { "version": "3" } })).as_deref(),
            Some("3")
        );
        assert_eq!(version_in(&json!({ "version": "  " })), None);
        assert_eq!(version_in(&json!({})), None);
    }
}
