//! One-off transactions: gastos, ingresos and traspasos.
//!
//! Every foreign key travels with a denormalized display name so lists can be
//! rendered without resolving the catalogs.

use super::{fecha, require_amount, require_id, EntityId, Validate};
use crate::error::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gasto {
    /// Server identifier
    pub id: EntityId,
    /// Amount in the account currency
    pub importe: f64,
    /// Date of the movement
    #[serde(with = "fecha")]
    pub fecha: NaiveDateTime,
    /// Free-text note
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Concept
    #[serde(default)]
    pub concepto_id: Option<EntityId>,
    /// Concept name, resolved by the server
    #[serde(default)]
    pub concepto_nombre: Option<String>,
    /// Category
    #[serde(default)]
    pub categoria_id: Option<EntityId>,
    /// Category name, resolved by the server
    #[serde(default)]
    pub categoria_nombre: Option<String>,
    /// Supplier
    #[serde(default)]
    pub proveedor_id: Option<EntityId>,
    /// Supplier name, resolved by the server
    #[serde(default)]
    pub proveedor_nombre: Option<String>,
    /// Person involved, if any
    #[serde(default)]
    pub persona_id: Option<EntityId>,
    /// Person name, resolved by the server
    #[serde(default)]
    pub persona_nombre: Option<String>,
    /// Account charged or credited
    #[serde(default)]
    pub cuenta_id: Option<EntityId>,
    /// Account name, resolved by the server
    #[serde(default)]
    pub cuenta_nombre: Option<String>,
    /// Payment method
    #[serde(default)]
    pub forma_pago_id: Option<EntityId>,
    /// Payment method name, resolved by the server
    #[serde(default)]
    pub forma_pago_nombre: Option<String>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingreso {
    /// Server identifier
    pub id: EntityId,
    /// Amount in the account currency
    pub importe: f64,
    /// Date of the movement
    #[serde(with = "fecha")]
    pub fecha: NaiveDateTime,
    /// Free-text note
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Concept
    #[serde(default)]
    pub concepto_id: Option<EntityId>,
    /// Concept name, resolved by the server
    #[serde(default)]
    pub concepto_nombre: Option<String>,
    /// Category
    #[serde(default)]
    pub categoria_id: Option<EntityId>,
    /// Category name, resolved by the server
    #[serde(default)]
    pub categoria_nombre: Option<String>,
    /// Client
    #[serde(default)]
    pub cliente_id: Option<EntityId>,
    /// Client name, resolved by the server
    #[serde(default)]
    pub cliente_nombre: Option<String>,
    /// Person involved, if any
    #[serde(default)]
    pub persona_id: Option<EntityId>,
    /// Person name, resolved by the server
    #[serde(default)]
    pub persona_nombre: Option<String>,
    /// Account charged or credited
    #[serde(default)]
    pub cuenta_id: Option<EntityId>,
    /// Account name, resolved by the server
    #[serde(default)]
    pub cuenta_nombre: Option<String>,
    /// Payment method
    #[serde(default)]
    pub forma_pago_id: Option<EntityId>,
    /// Payment method name, resolved by the server
    #[serde(default)]
    pub forma_pago_nombre: Option<String>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Transfer between two accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traspaso {
    /// Server identifier
    pub id: EntityId,
    /// Amount in the account currency
    pub importe: f64,
    /// Date of the movement
    #[serde(with = "fecha")]
    pub fecha: NaiveDateTime,
    /// Free-text note
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Source account
    #[serde(default)]
    pub cuenta_origen_id: Option<EntityId>,
    /// Source account name
    #[serde(default)]
    pub cuenta_origen_nombre: Option<String>,
    /// Destination account
    #[serde(default)]
    pub cuenta_destino_id: Option<EntityId>,
    /// Destination account name
    #[serde(default)]
    pub cuenta_destino_nombre: Option<String>,
    /// Owning user
    #[serde(default)]
    pub usuario_id: Option<EntityId>,
}

/// Create/update payload for gastos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoGasto {
    /// Amount in the account currency
    pub importe: f64,
    /// Date of the movement
    #[serde(with = "fecha")]
    pub fecha: NaiveDateTime,
    /// Free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// Concept
    pub concepto_id: Option<EntityId>,
    /// Category
    pub categoria_id: Option<EntityId>,
    /// Supplier
    pub proveedor_id: Option<EntityId>,
    /// Person involved, if any
    pub persona_id: Option<EntityId>,
    /// Account charged or credited
    pub cuenta_id: Option<EntityId>,
    /// Payment method
    pub forma_pago_id: Option<EntityId>,
}

impl Validate for NuevoGasto {
    fn validate(&self) -> Result<(), ValidationError> {
        require_amount(self.importe)?;
        require_id(self.concepto_id.as_ref(), "concepto")?;
        require_id(self.cuenta_id.as_ref(), "cuenta")
    }
}

/// Create/update payload for ingresos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoIngreso {
    /// Amount in the account currency
    pub importe: f64,
    /// Date of the movement
    #[serde(with = "fecha")]
    pub fecha: NaiveDateTime,
    /// Free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// Concept
    pub concepto_id: Option<EntityId>,
    /// Category
    pub categoria_id: Option<EntityId>,
    /// Client
    pub cliente_id: Option<EntityId>,
    /// Person involved, if any
    pub persona_id: Option<EntityId>,
    /// Account charged or credited
    pub cuenta_id: Option<EntityId>,
    /// Payment method
    pub forma_pago_id: Option<EntityId>,
}

impl Validate for NuevoIngreso {
    fn validate(&self) -> Result<(), ValidationError> {
        require_amount(self.importe)?;
        require_id(self.concepto_id.as_ref(), "concepto")?;
        require_id(self.cuenta_id.as_ref(), "cuenta")
    }
}

/// Create/update payload for traspasos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoTraspaso {
    /// Amount in the account currency
    pub importe: f64,
    /// Date of the movement
    #[serde(with = "fecha")]
    pub fecha: NaiveDateTime,
    /// Free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// Source account
    pub cuenta_origen_id: Option<EntityId>,
    /// Destination account
    pub cuenta_destino_id: Option<EntityId>,
}

impl Validate for NuevoTraspaso {
    fn validate(&self) -> Result<(), ValidationError> {
        require_amount(self.importe)?;
        require_id(self.cuenta_origen_id.as_ref(), "cuenta de origen")?;
        require_id(self.cuenta_destino_id.as_ref(), "cuenta de destino")?;
        if self.cuenta_origen_id == self.cuenta_destino_id {
            return Err(ValidationError::SameAccount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoy() -> NaiveDateTime {
        fecha::parse("2024-05-10T12:00:00").unwrap()
    }

    fn gasto_valido() -> NuevoGasto {
        NuevoGasto {
            importe: 42.5,
            fecha: hoy(),
            descripcion: None,
            concepto_id: Some("con".into()),
            categoria_id: None,
            proveedor_id: None,
            persona_id: None,
            cuenta_id: Some("cta".into()),
            forma_pago_id: None,
        }
    }

    #[test]
    fn gasto_from_backend_json() {
        let json = r#"{
            "id": "g1",
            "importe": 12.3,
            "fecha": "2024-05-10T00:00:00Z",
            "conceptoId": "c1",
            "conceptoNombre": "Supermercado",
            "cuentaId": "a1",
            "cuentaNombre": "Efectivo"
        }"#;
        let gasto: Gasto = serde_json::from_str(json).unwrap();

        assert_eq!(gasto.concepto_nombre.as_deref(), Some("Supermercado"));
        assert_eq!(gasto.cuenta_id, Some(EntityId::from("a1")));
        assert!(gasto.proveedor_id.is_none());
    }

    #[test]
    fn gasto_input_requires_amount_concepto_and_cuenta() {
        assert!(gasto_valido().validate().is_ok());

        let sin_importe = NuevoGasto { importe: 0.0, ..gasto_valido() };
        assert_eq!(sin_importe.validate(), Err(ValidationError::NonPositiveAmount));

        let sin_cuenta = NuevoGasto { cuenta_id: None, ..gasto_valido() };
        assert_eq!(sin_cuenta.validate(), Err(ValidationError::Required("cuenta")));

        let sin_concepto = NuevoGasto { concepto_id: Some("  ".into()), ..gasto_valido() };
        assert_eq!(sin_concepto.validate(), Err(ValidationError::Required("concepto")));
    }

    #[test]
    fn traspaso_rejects_same_account() {
        let traspaso = NuevoTraspaso {
            importe: 100.0,
            fecha: hoy(),
            descripcion: None,
            cuenta_origen_id: Some("a".into()),
            cuenta_destino_id: Some("a".into()),
        };
        assert_eq!(traspaso.validate(), Err(ValidationError::SameAccount));
    }

    #[test]
    fn input_serializes_wire_date() {
        let body = serde_json::to_value(gasto_valido()).unwrap();
        assert_eq!(body["fecha"], "2024-05-10T12:00:00");
        assert_eq!(body["cuentaId"], "cta");
        assert!(body.get("descripcion").is_none());
    }
}
