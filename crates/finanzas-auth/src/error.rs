//! Error types for session handling

use finanzas_http::{HttpError, StorageError};

/// JWT payload could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not three dot-separated segments
    #[error("token must have three segments, found {0}")]
    Segments(usize),

    /// Payload is not base64url
    #[error("payload is not base64url: {0}")]
    Base64(String),

    /// Payload is not a JSON object
    #[error("payload is not a JSON object: {0}")]
    Json(String),

    /// A required claim is absent
    #[error("missing claim {0}")]
    MissingClaim(&'static str),
}

/// Errors from login, registration and session restore
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Request failed
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Server answered with `isSuccess: false`
    #[error("{0}")]
    Rejected(String),

    /// Login response lacked a token
    #[error("invalid login response: {0}")]
    InvalidResponse(String),

    /// Token could not be decoded
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Session storage could not be written
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Spanish message for the login form
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Http(e) => e.user_message(),
            AuthError::Rejected(message) => message.clone(),
            AuthError::InvalidResponse(_) | AuthError::Token(_) => {
                "La respuesta del servidor de autenticación no es válida.".to_string()
            }
            AuthError::Storage(_) => "No se pudo guardar la sesión.".to_string(),
        }
    }
}
