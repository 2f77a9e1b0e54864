//! Entity model
//!
//! Flat records identified by an opaque string id and owned by a `usuarioId`.
//! Field names follow the backend's camelCase JSON.

pub mod catalogo;
pub mod fecha;
pub mod programado;
pub mod transaccion;
pub mod usuario;

pub use catalogo::{
    Categoria, Cliente, Concepto, Cuenta, FormaPago, NuevaCuenta, NuevoCatalogo, NuevoConcepto,
    Persona, Proveedor,
};
pub use programado::{
    Frecuencia, GastoProgramado, IngresoProgramado, NuevoGastoProgramado, NuevoIngresoProgramado,
    NuevoTraspasoProgramado, TraspasoProgramado,
};
pub use transaccion::{Gasto, Ingreso, NuevoGasto, NuevoIngreso, NuevoTraspaso, Traspaso};
pub use usuario::{LoginRequest, RegisterRequest, Usuario};

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Opaque entity identifier (UUID-shaped, assigned by the server)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a fresh random id
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Required-field checks run before an input is sent to the server
pub trait Validate {
    /// Check the input
    ///
    /// # Errors
    /// The first rule the input breaks.
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub(crate) fn require_amount(importe: f64) -> Result<(), ValidationError> {
    if importe.is_nan() || importe <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

pub(crate) fn require_id(id: Option<&EntityId>, field: &'static str) -> Result<(), ValidationError> {
    match id {
        Some(id) if !id.0.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::Required(field)),
    }
}
