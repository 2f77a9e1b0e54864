//! Route guards

use crate::session::AuthSession;
use finanzas_core::{Route, SessionConfig};

/// Result of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Navigation proceeds
    Allow,
    /// Navigation is replaced by this route
    Redirect(Route),
}

impl GuardOutcome {
    /// Whether navigation proceeds
    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

fn login_redirect(login_route: &str, target: &str) -> GuardOutcome {
    GuardOutcome::Redirect(Route::new(login_route).with_query("returnUrl", target))
}

/// Allow authenticated users; send everyone else to login with `returnUrl`
#[must_use]
pub fn auth_guard(session: &AuthSession, config: &SessionConfig, target: &str) -> GuardOutcome {
    if session.check_auth_status() {
        GuardOutcome::Allow
    } else {
        tracing::debug!("Blocked {}: not authenticated", target);
        login_redirect(&config.login_route, target)
    }
}

/// Allows only users whose role is in the list (case-insensitive)
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Vec<String>,
    login_route: String,
    access_denied_route: String,
}

impl RoleGuard {
    /// Guard for `allowed` roles with default routes
    #[must_use]
    pub fn new<S: Into<String>>(allowed: impl IntoIterator<Item = S>) -> Self {
        let defaults = SessionConfig::default();
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            login_route: defaults.login_route,
            access_denied_route: defaults.access_denied_route,
        }
    }

    /// Use `config`'s login and access-denied routes
    #[must_use]
    pub fn with_routes(mut self, config: &SessionConfig) -> Self {
        self.login_route.clone_from(&config.login_route);
        self.access_denied_route.clone_from(&config.access_denied_route);
        self
    }

    /// Evaluate for navigation to `target`
    #[must_use]
    pub fn check(&self, session: &AuthSession, target: &str) -> GuardOutcome {
        if !session.check_auth_status() {
            return login_redirect(&self.login_route, target);
        }
        match session.current_user() {
            Some(user) if user.has_any_role(self.allowed.as_slice()) => GuardOutcome::Allow,
            user => {
                tracing::warn!(
                    "Blocked {} for role {:?}",
                    target,
                    user.and_then(|u| u.rol)
                );
                GuardOutcome::Redirect(Route::new(self.access_denied_route.clone()))
            }
        }
    }
}
