//! Store errors

use finanzas_core::{EnvelopeError, ValidationError};
use finanzas_http::HttpError;

/// Operation a store was performing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Free-text search
    Search,
    /// Recent items
    Recent,
    /// Page load or single fetch
    Load,
    /// Create
    Create,
    /// Update
    Update,
    /// Delete
    Delete,
    /// Pause/resume
    Toggle,
    /// Move next execution
    Reschedule,
}

impl Action {
    /// Spanish infinitive used in fallback messages
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Action::Search => "buscar",
            Action::Recent => "obtener los recientes de",
            Action::Load => "cargar",
            Action::Create => "crear",
            Action::Update => "actualizar",
            Action::Delete => "eliminar",
            Action::Toggle => "cambiar el estado de",
            Action::Reschedule => "reprogramar",
        }
    }

    /// `Error al <verb> <label>`
    #[must_use]
    pub fn fallback_message(self, label: &str) -> String {
        format!("Error al {} {}", self.verb(), label)
    }
}

/// Errors from services and stores
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Request failed in the HTTP layer
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Server answered `isSuccess: false`
    #[error("{0}")]
    Api(String),

    /// Input rejected before sending
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Payload did not have the expected shape
    #[error("unexpected payload: {0}")]
    Decode(String),

    /// Failure annotated with the store's fallback message
    #[error("{fallback}: {source}")]
    Operation {
        /// Store-specific message
        fallback: String,
        /// Underlying failure
        #[source]
        source: Box<StoreError>,
    },
}

impl From<EnvelopeError> for StoreError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Failure(message) => StoreError::Api(message),
            other => StoreError::Decode(other.to_string()),
        }
    }
}

impl StoreError {
    /// Wrap with a store-specific fallback message
    #[must_use]
    pub fn during(self, action: Action, label: &str) -> Self {
        StoreError::Operation {
            fallback: action.fallback_message(label),
            source: Box::new(self),
        }
    }

    /// Message coming from the HTTP layer, the server or validation
    fn specific_message(&self) -> Option<String> {
        match self {
            StoreError::Http(e) => e.attached_user_message().map(str::to_string),
            StoreError::Api(message) => Some(message.clone()),
            StoreError::Validation(e) => Some(e.to_string()),
            StoreError::Decode(_) => None,
            StoreError::Operation { source, .. } => source.specific_message(),
        }
    }

    /// Spanish message for a page-level toast
    #[must_use]
    pub fn user_message(&self) -> String {
        self.specific_message().unwrap_or_else(|| match self {
            StoreError::Operation { fallback, .. } => fallback.clone(),
            StoreError::Http(e) => e.user_message(),
            _ => "Ha ocurrido un error inesperado.".to_string(),
        })
    }

    /// Whether the input never left the client
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            StoreError::Validation(_) => true,
            StoreError::Operation { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn interceptor_message_wins_over_fallback() {
        let http = HttpError::status(404, "u", Value::Null)
            .with_user_message("El recurso solicitado no existe.");
        let err = StoreError::from(http).during(Action::Delete, "categoría");
        assert_eq!(err.user_message(), "El recurso solicitado no existe.");
    }

    #[test]
    fn fallback_when_nothing_specific() {
        let http = HttpError::status(500, "u", Value::Null);
        let err = StoreError::from(http).during(Action::Delete, "categoría");
        assert_eq!(err.user_message(), "Error al eliminar categoría");

        let decode = StoreError::Decode("x".into()).during(Action::Load, "gasto");
        assert_eq!(decode.user_message(), "Error al cargar gasto");
    }

    #[test]
    fn envelope_failure_becomes_api_error() {
        let err = StoreError::from(EnvelopeError::Failure("Nombre duplicado".into()))
            .during(Action::Create, "proveedor");
        assert_eq!(err.user_message(), "Nombre duplicado");
    }

    #[test]
    fn validation_is_detected_through_wrapping() {
        let err = StoreError::from(ValidationError::Required("nombre"))
            .during(Action::Create, "categoría");
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "El campo nombre es obligatorio");
    }
}
