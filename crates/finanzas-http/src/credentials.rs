//! Credential injection and session-expiry handling

use crate::chain::{Interceptor, Next};
use crate::error::HttpError;
use crate::request::{HttpRequest, HttpResponse};
use crate::storage::{SessionStorage, AUTH_COOKIE};
use async_trait::async_trait;
use finanzas_core::{Navigator, Route, SessionConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// Lets one caller through per cooldown window
#[derive(Debug)]
pub struct RedirectGate {
    cooldown: Duration,
    blocked_until: Mutex<Option<Instant>>,
}

impl RedirectGate {
    /// Gate reopening `cooldown` after each accepted entry
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            blocked_until: Mutex::new(None),
        }
    }

    /// True for the first caller of a window; false while the window is open
    pub fn try_enter(&self) -> bool {
        let now = Instant::now();
        let mut blocked_until = self.blocked_until.lock();
        if blocked_until.is_some_and(|until| now < until) {
            return false;
        }
        *blocked_until = Some(now + self.cooldown);
        true
    }

    /// Whether a redirect happened less than `cooldown` ago
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        self.blocked_until
            .lock()
            .is_some_and(|until| Instant::now() < until)
    }
}

/// Attaches the session cookie and turns 401s into a single login redirect
pub struct CredentialsInterceptor {
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    gate: RedirectGate,
    login_route: Route,
    expired: broadcast::Sender<()>,
}

impl CredentialsInterceptor {
    /// Interceptor using `config`'s login route and cooldown
    #[must_use]
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
        config: &SessionConfig,
    ) -> Self {
        let (expired, _) = broadcast::channel(8);
        Self {
            storage,
            navigator,
            gate: RedirectGate::new(config.redirect_cooldown()),
            login_route: Route::new(config.login_route.clone()),
            expired,
        }
    }

    /// Receive one event per session-expiry redirect
    #[must_use]
    pub fn subscribe_expired(&self) -> broadcast::Receiver<()> {
        self.expired.subscribe()
    }

    /// Whether a redirect is within its cooldown
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        self.gate.is_redirecting()
    }

    fn on_session_expired(&self, url: &str) {
        if !self.gate.try_enter() {
            tracing::debug!("401 from {} ignored, redirect already in progress", url);
            return;
        }
        tracing::warn!(
            "Session expired calling {}, redirecting to {}",
            url,
            self.login_route
        );
        if let Err(e) = self.storage.clear_session() {
            tracing::error!("Failed to clear session storage: {}", e);
        }
        // No subscribers is fine
        let _ = self.expired.send(());
        self.navigator.navigate(&self.login_route);
    }
}

#[async_trait]
impl Interceptor for CredentialsInterceptor {
    fn name(&self) -> &'static str {
        "credentials"
    }

    async fn intercept(
        &self,
        mut request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, HttpError> {
        request.with_credentials = true;
        if request.header("cookie").is_none() {
            if let Some(token) = self.storage.cookie(AUTH_COOKIE) {
                request = request.with_header("Cookie", format!("{AUTH_COOKIE}={token}"));
            }
        }

        let url = request.url.clone();
        let result = next.run(request).await;
        if let Err(err) = &result {
            if err.is_unauthorized() && !url.contains("/auth/") {
                self.on_session_expired(&url);
            }
        }
        result
    }
}

impl std::fmt::Debug for CredentialsInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsInterceptor")
            .field("gate", &self.gate)
            .field("login_route", &self.login_route)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn gate_reopens_after_cooldown() {
        let gate = RedirectGate::new(Duration::from_secs(1));

        assert!(gate.try_enter());
        assert!(!gate.try_enter());
        assert!(gate.is_redirecting());

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!gate.try_enter());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!gate.is_redirecting());
        assert!(gate.try_enter());
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let gate = RedirectGate::new(Duration::ZERO);
        assert!(gate.try_enter());
        assert!(gate.try_enter());
    }
}
