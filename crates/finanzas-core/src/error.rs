//! Error types for Finanzas Core
//!
//! - Configuration loading failures
//! - Envelope unwrapping failures
//! - Client-side validation of create/update inputs

use std::path::PathBuf;

/// Errors while loading client configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Offending key
        key: String,
        /// Why it was rejected
        message: String,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            /// File that failed
            path: path.into(),
            source,
        }
    }

    /// Create invalid value error
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            /// Offending key
            key: key.into(),
            /// Human-readable message
            message: message.into(),
        }
    }
}

/// Errors while unwrapping a response envelope
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// Server reported `isSuccess: false`
    #[error("{0}")]
    Failure(String),

    /// Success envelope without a value
    #[error("la respuesta no contiene datos")]
    MissingValue,

    /// Body did not match the expected shape
    #[error("respuesta con formato inesperado: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client-side validation failures. Never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty
    #[error("El campo {0} es obligatorio")]
    Required(&'static str),

    /// Amount is zero or negative
    #[error("El importe debe ser mayor que cero")]
    NonPositiveAmount,

    /// Transfer from an account to itself
    #[error("La cuenta de origen y la de destino deben ser distintas")]
    SameAccount,
}
