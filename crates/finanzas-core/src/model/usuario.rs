//! Authenticated user and auth request payloads

use serde::{Deserialize, Serialize};

use super::EntityId;

/// User decoded from the session token and mirrored into `user_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    /// User identifier (`sub` claim)
    pub id: EntityId,
    /// E-mail address
    pub correo: String,
    /// Given name
    pub nombre: String,
    /// Surname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellidos: Option<String>,
    /// Role claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rol: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Usuario {
    /// Case-insensitive role membership
    #[must_use]
    pub fn has_any_role<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        match self.rol.as_deref() {
            Some(rol) => allowed.iter().any(|a| a.as_ref().eq_ignore_ascii_case(rol)),
            None => false,
        }
    }

    /// Name plus surname when present
    #[must_use]
    pub fn nombre_completo(&self) -> String {
        match self.apellidos.as_deref() {
            Some(apellidos) if !apellidos.trim().is_empty() => {
                format!("{} {}", self.nombre, apellidos.trim())
            }
            _ => self.nombre.clone(),
        }
    }
}

/// Credentials posted to `/auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// E-mail address
    pub correo: String,
    /// Password
    pub contrasena: String,
}

impl LoginRequest {
    /// Build from email and password
    #[inline]
    #[must_use]
    pub fn new(correo: impl Into<String>, contrasena: impl Into<String>) -> Self {
        Self {
            correo: correo.into(),
            contrasena: contrasena.into(),
        }
    }
}

/// Sign-up payload posted to `/auth/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Given name
    pub nombre: String,
    /// Surname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellidos: Option<String>,
    /// E-mail address
    pub correo: String,
    /// Password
    pub contrasena: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario(rol: Option<&str>) -> Usuario {
        Usuario {
            id: "u1".into(),
            correo: "ana@example.com".to_string(),
            nombre: "Ana".to_string(),
            apellidos: Some("García".to_string()),
            rol: rol.map(str::to_string),
            avatar: None,
        }
    }

    #[test]
    fn role_check_ignores_case() {
        assert!(usuario(Some("Admin")).has_any_role(&["ADMIN", "user"]));
        assert!(!usuario(Some("guest")).has_any_role(&["ADMIN"]));
        assert!(!usuario(None).has_any_role(&["ADMIN"]));
    }

    #[test]
    fn full_name() {
        assert_eq!(usuario(None).nombre_completo(), "Ana García");
    }

    #[test]
    fn login_payload_field_names() {
        let body = serde_json::to_value(LoginRequest::new("a@b.com", "x")).unwrap();
        assert_eq!(body, serde_json::json!({ "correo": "a@b.com", "contrasena": "x" }));
    }
}
