//! Spanish user-facing messages per failure class

use crate::error::HttpError;

/// No response (DNS, refused, timeout)
pub const MSG_NETWORK: &str =
    "No se pudo conectar con el servidor. Verifica tu conexión a internet.";
/// 400
pub const MSG_BAD_REQUEST: &str = "Solicitud inválida. Revisa los datos enviados.";
/// 401
pub const MSG_UNAUTHORIZED: &str = "Tu sesión ha expirado. Inicia sesión nuevamente.";
/// 403
pub const MSG_FORBIDDEN: &str = "No tienes permisos para realizar esta acción.";
/// 404
pub const MSG_NOT_FOUND: &str = "El recurso solicitado no existe.";
/// 409
pub const MSG_CONFLICT: &str = "El registro entra en conflicto con otro existente.";
/// 422
pub const MSG_UNPROCESSABLE: &str = "Los datos enviados no son válidos.";
/// 5xx
pub const MSG_SERVER: &str = "Error del servidor. Inténtalo de nuevo más tarde.";
/// Undecodable body
pub const MSG_DECODE: &str = "La respuesta del servidor no tiene el formato esperado.";
/// Anything else
pub const MSG_UNEXPECTED: &str = "Ha ocurrido un error inesperado.";

/// Message for `error`. Validation-style statuses prefer the server's own text.
#[must_use]
pub fn user_message_for(error: &HttpError) -> String {
    match error {
        HttpError::Network { .. } => MSG_NETWORK.to_string(),
        HttpError::Decode { .. } => MSG_DECODE.to_string(),
        HttpError::InvalidRequest(_) => MSG_UNEXPECTED.to_string(),
        HttpError::Status { status, .. } => {
            let fixed = match status {
                400 => MSG_BAD_REQUEST,
                401 => MSG_UNAUTHORIZED,
                403 => MSG_FORBIDDEN,
                404 => MSG_NOT_FOUND,
                409 => MSG_CONFLICT,
                422 => MSG_UNPROCESSABLE,
                500..=599 => MSG_SERVER,
                _ => MSG_UNEXPECTED,
            };
            if matches!(status, 400 | 409 | 422) {
                error.server_message().unwrap_or_else(|| fixed.to_string())
            } else {
                fixed.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn status(code: u16) -> HttpError {
        HttpError::status(code, "http://api/gastos", Value::Null)
    }

    #[test]
    fn fixed_messages() {
        assert_eq!(user_message_for(&status(401)), MSG_UNAUTHORIZED);
        assert_eq!(user_message_for(&status(403)), MSG_FORBIDDEN);
        assert_eq!(user_message_for(&status(404)), MSG_NOT_FOUND);
        assert_eq!(user_message_for(&status(502)), MSG_SERVER);
        assert_eq!(user_message_for(&status(418)), MSG_UNEXPECTED);
        assert_eq!(
            user_message_for(&HttpError::network("http://api", "refused")),
            MSG_NETWORK
        );
    }

    #[test]
    fn bad_request_prefers_server_text() {
        let err = HttpError::status(400, "u", json!({ "error": { "message": "La fecha es obligatoria" } }));
        assert_eq!(user_message_for(&err), "La fecha es obligatoria");
        assert_eq!(user_message_for(&status(400)), MSG_BAD_REQUEST);
    }

    #[test]
    fn server_errors_hide_server_text() {
        let err = HttpError::status(500, "u", json!({ "message": "NullReferenceException" }));
        assert_eq!(user_message_for(&err), MSG_SERVER);
    }
}
