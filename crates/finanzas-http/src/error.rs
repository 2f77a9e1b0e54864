//! Error types for the HTTP layer
//!
//! - Transport failures (status 0)
//! - Non-2xx responses
//! - Undecodable bodies
//! - Session storage failures

use serde_json::Value;
use std::path::PathBuf;

/// Error produced by the interceptor chain or the client
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    /// Request never got a response
    #[error("network error calling {url}: {message}")]
    Network {
        url: String,
        message: String,
        user_message: Option<String>,
    },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status {
        status: u16,
        url: String,
        body: Value,
        user_message: Option<String>,
    },

    /// Body did not match the expected type
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Request could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HttpError {
    /// Create network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
            user_message: None,
        }
    }

    /// Create status error
    pub fn status(status: u16, url: impl Into<String>, body: Value) -> Self {
        Self::Status {
            status,
            url: url.into(),
            body,
            user_message: None,
        }
    }

    /// Create decode error
    pub fn decode(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// HTTP status; 0 when no response was received
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            _ => 0,
        }
    }

    /// Whether the server answered 401
    #[inline]
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == 401
    }

    /// URL of the failed request
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Network { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                Some(url)
            }
            Self::InvalidRequest(_) => None,
        }
    }

    /// Message the server put in the body (`error.message`, `message` or `title`)
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let candidates = [
            body.pointer("/error/message"),
            body.get("message"),
            body.get("title"),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Attach the user-facing message
    #[must_use]
    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        match &mut self {
            Self::Network { user_message, .. } | Self::Status { user_message, .. } => {
                *user_message = Some(message.into());
            }
            Self::Decode { .. } | Self::InvalidRequest(_) => {}
        }
        self
    }

    /// Attached user-facing message, if the error interceptor saw this error
    #[must_use]
    pub fn attached_user_message(&self) -> Option<&str> {
        match self {
            Self::Network { user_message, .. } | Self::Status { user_message, .. } => {
                user_message.as_deref()
            }
            _ => None,
        }
    }

    /// User-facing Spanish message: the attached one, else the default for the error
    #[must_use]
    pub fn user_message(&self) -> String {
        self.attached_user_message()
            .map_or_else(|| crate::messages::user_message_for(self), str::to_string)
    }
}

/// Errors reading or writing session storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file is not valid JSON
    #[error("corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_code_is_zero_without_response() {
        assert_eq!(HttpError::network("http://x", "refused").status_code(), 0);
        assert_eq!(HttpError::status(404, "http://x", Value::Null).status_code(), 404);
    }

    #[test]
    fn server_message_lookup_order() {
        let nested = HttpError::status(400, "u", json!({ "error": { "message": "Nombre duplicado" } }));
        assert_eq!(nested.server_message().as_deref(), Some("Nombre duplicado"));

        let flat = HttpError::status(400, "u", json!({ "message": " Falta fecha " }));
        assert_eq!(flat.server_message().as_deref(), Some("Falta fecha"));

        let problem = HttpError::status(400, "u", json!({ "title": "One or more validation errors occurred." }));
        assert!(problem.server_message().is_some());

        let empty = HttpError::status(400, "u", json!({ "message": "" }));
        assert!(empty.server_message().is_none());
    }

    #[test]
    fn attached_message_wins() {
        let err = HttpError::status(500, "u", Value::Null).with_user_message("personalizado");
        assert_eq!(err.user_message(), "personalizado");
    }

    #[test]
    fn decode_errors_ignore_user_message() {
        let err = HttpError::decode("u", "expected array").with_user_message("x");
        assert!(err.attached_user_message().is_none());
    }
}
