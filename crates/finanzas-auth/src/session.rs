//! Session manager
//!
//! [`AuthSession`] owns the auth cookie and the two local items, and publishes
//! the current user and the authenticated flag through `watch` channels.
//! Nothing here talks to the server except `login` and `register`; logout is
//! purely local.

use crate::error::AuthError;
use crate::jwt::{decode_claims, usuario_from_claims, Claims};
use chrono::{DateTime, Utc};
use finanzas_core::model::fecha;
use finanzas_core::{ApiEnvelope, DataEnvelope, EnvelopeError, LoginRequest, RegisterRequest, Usuario};
use finanzas_http::{
    ApiClient, Cookie, SessionStorage, AUTH_COOKIE, TOKEN_EXPIRES_AT, USER_DATA,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Login endpoint
pub const LOGIN_PATH: &str = "/auth/login";
/// Sign-up endpoint
pub const REGISTER_PATH: &str = "/auth/register";

/// Body returned by [`LOGIN_PATH`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed JWT
    pub token: String,
    /// Token expiry as sent by the server
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl LoginResponse {
    /// Accepts the raw body, `{isSuccess, value}` or `{data}`
    ///
    /// # Errors
    /// Failed envelope, or no token anywhere.
    pub fn from_body(body: Value) -> Result<Self, AuthError> {
        let invalid = |e: serde_json::Error| AuthError::InvalidResponse(e.to_string());
        if body.get("isSuccess").is_some() {
            let envelope: ApiEnvelope<Self> = serde_json::from_value(body).map_err(invalid)?;
            return envelope.into_result().map_err(|e| match e {
                EnvelopeError::Failure(message) => AuthError::Rejected(message),
                other => AuthError::InvalidResponse(other.to_string()),
            });
        }
        if body.get("data").is_some() {
            let envelope: DataEnvelope<Self> = serde_json::from_value(body).map_err(invalid)?;
            return Ok(envelope.data);
        }
        serde_json::from_value(body).map_err(invalid)
    }

    /// `expiresAt` parsed; naive timestamps are taken as UTC
    #[must_use]
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_at.as_deref()?;
        fecha::parse(raw).map(|naive| naive.and_utc())
    }
}

/// Client-side session state
pub struct AuthSession {
    client: ApiClient,
    storage: Arc<dyn SessionStorage>,
    current_user: watch::Sender<Option<Usuario>>,
    authenticated: watch::Sender<bool>,
}

impl AuthSession {
    /// Session restored from `storage` when its token is still valid
    #[must_use]
    pub fn new(client: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        let (current_user, _) = watch::channel(None);
        let (authenticated, _) = watch::channel(false);
        let session = Self {
            client,
            storage,
            current_user,
            authenticated,
        };
        session.check_auth_status();
        session
    }

    /// Log in and persist the session
    ///
    /// # Errors
    /// Request failure, rejected credentials, undecodable token or storage failure.
    pub async fn login(&self, request: &LoginRequest) -> Result<Usuario, AuthError> {
        let body = self.client.post_json(LOGIN_PATH, request).await?;
        let response = LoginResponse::from_body(body)?;
        let claims = decode_claims(&response.token)?;
        let usuario = usuario_from_claims(&claims, Some(&request.correo))?;
        let expires = response.expiry().or_else(|| claims.expires_at());

        let mut cookie = Cookie::new(AUTH_COOKIE, response.token.as_str());
        if let Some(expires) = expires {
            cookie = cookie.with_expires(expires);
            self.storage
                .set_item(TOKEN_EXPIRES_AT, &expires.to_rfc3339())?;
        }
        self.storage.set_cookie(cookie)?;
        let user_json = serde_json::to_string(&usuario)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        self.storage.set_item(USER_DATA, &user_json)?;

        self.publish(Some(usuario.clone()));
        tracing::info!("Logged in as {}", usuario.correo);
        Ok(usuario)
    }

    /// Create an account; does not log in
    ///
    /// # Errors
    /// Request failure or a rejected registration.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        let body = self.client.post_json(REGISTER_PATH, request).await?;
        if let Some(false) = body.get("isSuccess").and_then(Value::as_bool) {
            let envelope: ApiEnvelope<Value> = serde_json::from_value(body)
                .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
            return Err(AuthError::Rejected(envelope.error_message()));
        }
        tracing::info!("Registered {}", request.correo);
        Ok(())
    }

    /// Drop the cookie and local items; no server round trip
    ///
    /// # Errors
    /// Storage could not be written. Observables are cleared regardless.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.publish(None);
        self.storage.clear_session()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Cookie present, decodable and not past `exp`
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        self.valid_claims().is_some()
    }

    fn valid_claims(&self) -> Option<Claims> {
        let token = self.storage.cookie(AUTH_COOKIE)?;
        match decode_claims(&token) {
            Ok(claims) if !claims.is_expired_at(Utc::now()) => Some(claims),
            Ok(_) => {
                tracing::debug!("Stored token has expired");
                None
            }
            Err(e) => {
                tracing::warn!("Stored token could not be decoded: {}", e);
                None
            }
        }
    }

    /// Re-derive the observables from storage; returns the authenticated flag
    pub fn check_auth_status(&self) -> bool {
        let user = self.valid_claims().and_then(|claims| {
            self.stored_user()
                .or_else(|| usuario_from_claims(&claims, None).ok())
        });
        let authenticated = user.is_some();
        self.publish(user);
        authenticated
    }

    fn stored_user(&self) -> Option<Usuario> {
        let raw = self.storage.item(USER_DATA)?;
        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!("Discarding unreadable user_data: {}", e))
            .ok()
    }

    /// Clear the observables whenever the credentials interceptor reports expiry
    pub fn watch_expiry(self: &Arc<Self>, mut expired: broadcast::Receiver<()>) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match expired.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        let Some(session) = weak.upgrade() else {
                            break;
                        };
                        tracing::info!("Session expired, clearing user");
                        session.publish(None);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn publish(&self, user: Option<Usuario>) {
        let authenticated = user.is_some();
        self.current_user.send_replace(user);
        self.authenticated.send_replace(authenticated);
    }

    /// Current user
    #[must_use]
    pub fn current_user(&self) -> Option<Usuario> {
        self.current_user.borrow().clone()
    }

    /// Authenticated flag
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    /// Observe the current user
    #[must_use]
    pub fn subscribe_user(&self) -> watch::Receiver<Option<Usuario>> {
        self.current_user.subscribe()
    }

    /// Observe the authenticated flag
    #[must_use]
    pub fn subscribe_authenticated(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// Raw token, if a live cookie exists
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.cookie(AUTH_COOKIE)
    }

    /// Stored expiry
    #[must_use]
    pub fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.storage.item(TOKEN_EXPIRES_AT)?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.current_user().map(|u| u.correo))
            .finish_non_exhaustive()
    }
}
