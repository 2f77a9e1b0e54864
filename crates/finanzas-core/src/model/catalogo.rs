//! Reference catalogs: categorías, conceptos, proveedores, clientes, personas,
//! cuentas and formas de pago.

use super::{fecha, require_text, EntityId, Validate};
use crate::error::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Expense/income category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categoria {
    /// Server identifier
    pub id: EntityId,
    /// Display name
    pub nombre: String,
    /// Creation timestamp
    #[serde(default, with = "fecha::option")]
    pub fecha_creacion: Option<NaiveDateTime>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Concept, optionally grouped under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concepto {
    /// Server identifier
    pub id: EntityId,
    /// Display name
    pub nombre: String,
    /// Category
    #[serde(default)]
    pub categoria_id: Option<EntityId>,
    /// Category name, resolved by the server
    #[serde(default)]
    pub categoria_nombre: Option<String>,
    /// Creation timestamp
    #[serde(default, with = "fecha::option")]
    pub fecha_creacion: Option<NaiveDateTime>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Provider (counterparty of an expense)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proveedor {
    /// Server identifier
    pub id: EntityId,
    /// Display name
    pub nombre: String,
    /// Creation timestamp
    #[serde(default, with = "fecha::option")]
    pub fecha_creacion: Option<NaiveDateTime>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Client (counterparty of an income)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    /// Server identifier
    pub id: EntityId,
    /// Display name
    pub nombre: String,
    /// Creation timestamp
    #[serde(default, with = "fecha::option")]
    pub fecha_creacion: Option<NaiveDateTime>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Person a transaction is attributed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Server identifier
    pub id: EntityId,
    /// Display name
    pub nombre: String,
    /// Creation timestamp
    #[serde(default, with = "fecha::option")]
    pub fecha_creacion: Option<NaiveDateTime>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Money account. The balance is maintained server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cuenta {
    /// Server identifier
    pub id: EntityId,
    /// Display name
    pub nombre: String,
    /// Current balance
    #[serde(default)]
    pub saldo: f64,
    /// Creation timestamp
    #[serde(default, with = "fecha::option")]
    pub fecha_creacion: Option<NaiveDateTime>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormaPago {
    /// Server identifier
    pub id: EntityId,
    /// Display name
    pub nombre: String,
    /// Creation timestamp
    #[serde(default, with = "fecha::option")]
    pub fecha_creacion: Option<NaiveDateTime>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Create/update payload for name-only catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoCatalogo {
    /// Display name
    pub nombre: String,
}

impl NuevoCatalogo {
    /// Payload with the given name, trimmed
    #[inline]
    #[must_use]
    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into().trim().to_string(),
        }
    }
}

impl Validate for NuevoCatalogo {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.nombre, "nombre")
    }
}

/// Create/update payload for conceptos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoConcepto {
    /// Display name
    pub nombre: String,
    /// Category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<EntityId>,
}

impl NuevoConcepto {
    /// Payload with the given name and no category
    #[inline]
    #[must_use]
    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into().trim().to_string(),
            categoria_id: None,
        }
    }

    /// Group under a category
    #[inline]
    #[must_use]
    pub fn with_categoria(mut self, categoria_id: impl Into<EntityId>) -> Self {
        self.categoria_id = Some(categoria_id.into());
        self
    }
}

impl Validate for NuevoConcepto {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.nombre, "nombre")
    }
}

/// Create/update payload for cuentas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevaCuenta {
    /// Display name
    pub nombre: String,
    /// Current balance
    pub saldo: f64,
}

impl NuevaCuenta {
    /// Account with an opening balance
    #[inline]
    #[must_use]
    pub fn new(nombre: impl Into<String>, saldo: f64) -> Self {
        Self {
            nombre: nombre.into().trim().to_string(),
            saldo,
        }
    }
}

impl Validate for NuevaCuenta {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.nombre, "nombre")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn categoria_from_backend_json() {
        let json = r#"{
            "id": "1",
            "nombre": "Alimentación",
            "fechaCreacion": "2024-01-05T09:30:00",
            "usuarioId": "u-1"
        }"#;
        let categoria: Categoria = serde_json::from_str(json).unwrap();

        assert_eq!(categoria.nombre, "Alimentación");
        assert_eq!(categoria.usuario_id, Some(EntityId::from("u-1")));
        assert!(categoria.fecha_creacion.is_some());
    }

    #[test]
    fn minimal_catalog_json_is_accepted() {
        let categoria: Categoria = serde_json::from_str(r#"{"id":"1","nombre":"Ocio"}"#).unwrap();
        assert!(categoria.fecha_creacion.is_none());
        assert!(categoria.usuario_id.is_none());
    }

    #[test]
    fn cuenta_keeps_balance() {
        let cuenta: Cuenta =
            serde_json::from_str(r#"{"id":"c","nombre":"Banco","saldo":1250.5}"#).unwrap();
        assert_eq!(cuenta.saldo, 1250.5);
    }

    #[test]
    fn blank_names_fail_validation() {
        assert_eq!(
            NuevoCatalogo::new("   ").validate(),
            Err(ValidationError::Required("nombre"))
        );
        assert!(NuevoCatalogo::new("Transporte").validate().is_ok());
        assert!(NuevaCuenta::new("", 0.0).validate().is_err());
    }

    #[test]
    fn concepto_payload_omits_missing_category() {
        let body = serde_json::to_value(NuevoConcepto::new("Gasolina")).unwrap();
        assert_eq!(body, serde_json::json!({ "nombre": "Gasolina" }));

        let body = serde_json::to_value(NuevoConcepto::new("Gasolina").with_categoria("cat")).unwrap();
        assert_eq!(body["categoriaId"], "cat");
    }
}
