//! Facade errors

use finanzas_auth::AuthError;
use finanzas_core::ConfigError;
use finanzas_http::{HttpError, StorageError};
use finanzas_store::StoreError;

/// Errors surfaced by [`crate::FinanzasApp`] and [`crate::UpdateWatcher`]
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transport could not be built or a request failed
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Session storage unavailable
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Login, registration or logout failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Version endpoint answered without a version
    #[error("no version in response from {0}")]
    MissingVersion(String),
}

impl AppError {
    /// Spanish message for the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http(e) => e.user_message(),
            AppError::Auth(e) => e.user_message(),
            AppError::Store(e) => e.user_message(),
            AppError::Config(_) | AppError::Storage(_) | AppError::MissingVersion(_) => {
                "Ha ocurrido un error inesperado.".to_string()
            }
        }
    }
}
