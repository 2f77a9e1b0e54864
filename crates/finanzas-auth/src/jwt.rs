//! JWT payload decoding
//!
//! The payload is read without verifying the signature. The server checks the
//! token on every request; these claims only drive what the client shows. Do not
//! use them for access decisions that matter.

use crate::error::TokenError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use finanzas_core::{EntityId, Usuario};
use serde_json::{Map, Value};

/// ASP.NET name-identifier claim
pub const CLAIM_NAME_IDENTIFIER: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
/// ASP.NET email claim
pub const CLAIM_EMAIL: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
/// ASP.NET name claim
pub const CLAIM_NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
/// ASP.NET role claim
pub const CLAIM_ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Decoded JWT payload
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    raw: Map<String, Value>,
}

impl Claims {
    /// First non-empty string among `keys`
    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.raw.get(*k))
            .filter_map(Value::as_str)
            .find(|v| !v.trim().is_empty())
    }

    /// `nameidentifier` or `sub`
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.first_str(&[CLAIM_NAME_IDENTIFIER, "sub"])
    }

    /// `email` or the `emailaddress` URI
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.first_str(&["email", CLAIM_EMAIL])
    }

    /// `name`, `nombre` or the `name` URI
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.first_str(&["name", "nombre", CLAIM_NAME])
    }

    /// `role` or the `role` URI
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.first_str(&["role", CLAIM_ROLE])
    }

    /// `exp` in seconds since the epoch
    #[must_use]
    pub fn exp(&self) -> Option<i64> {
        let exp = self.raw.get("exp")?;
        #[allow(clippy::cast_possible_truncation)]
        exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
    }

    /// `exp` as a timestamp
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp()?, 0)
    }

    /// Whether `exp * 1000 <= now_ms`. A token without `exp` counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp() {
            Some(exp) => exp.saturating_mul(1000) <= now.timestamp_millis(),
            None => true,
        }
    }

    /// Raw claim
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

/// Decode the payload segment of `token`
///
/// # Errors
/// Wrong segment count, bad base64url, or a payload that is not a JSON object.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Segments(segments.len()));
    }
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(raw)) => Ok(Claims { raw }),
        Ok(other) => Err(TokenError::Json(format!("expected object, found {other}"))),
        Err(e) => Err(TokenError::Json(e.to_string())),
    }
}

/// Build the session user from `claims`
///
/// `fallback_email` is used when the token carries no email (the address typed at login).
/// `nombre` falls back to the local part of the email.
///
/// # Errors
/// No user id claim.
pub fn usuario_from_claims(
    claims: &Claims,
    fallback_email: Option<&str>,
) -> Result<Usuario, TokenError> {
    let id = claims
        .user_id()
        .ok_or(TokenError::MissingClaim("sub"))?;
    let correo = claims
        .email()
        .or(fallback_email)
        .unwrap_or_default()
        .to_string();
    let nombre = claims.name().map_or_else(
        || correo.split('@').next().unwrap_or_default().to_string(),
        str::to_string,
    );

    Ok(Usuario {
        id: EntityId::from(id),
        correo,
        nombre,
        apellidos: None,
        rol: claims.role().map(str::to_string),
        avatar: None,
    })
}
