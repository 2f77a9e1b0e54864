//! Scheduled (recurring) transactions, executed by the server-side job scheduler.

use super::{fecha, require_amount, require_id, EntityId, Validate};
use crate::error::ValidationError;
use chrono::{Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Recurrence of a scheduled transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frecuencia {
    /// Every day
    Diario,
    /// Every week
    Semanal,
    /// Every month, clamped to the month's last day
    Mensual,
    /// Every year
    Anual,
}

impl Frecuencia {
    /// Occurrence following `fecha`
    ///
    /// Informational only, the scheduler decides the real execution time.
    #[must_use]
    pub fn next_after(self, fecha: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Frecuencia::Diario => fecha.checked_add_signed(Duration::days(1)),
            Frecuencia::Semanal => fecha.checked_add_signed(Duration::weeks(1)),
            Frecuencia::Mensual => fecha.checked_add_months(Months::new(1)),
            Frecuencia::Anual => fecha.checked_add_months(Months::new(12)),
        }
    }

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Frecuencia::Diario => "DIARIO",
            Frecuencia::Semanal => "SEMANAL",
            Frecuencia::Mensual => "MENSUAL",
            Frecuencia::Anual => "ANUAL",
        }
    }
}

impl std::fmt::Display for Frecuencia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frecuencia {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DIARIO" => Ok(Frecuencia::Diario),
            "SEMANAL" => Ok(Frecuencia::Semanal),
            "MENSUAL" => Ok(Frecuencia::Mensual),
            "ANUAL" => Ok(Frecuencia::Anual),
            _ => Err(ValidationError::Required("frecuencia")),
        }
    }
}

/// Scheduled expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GastoProgramado {
    /// Server identifier
    pub id: EntityId,
    /// Amount in the account currency
    pub importe: f64,
    /// Free-text note
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Recurrence
    pub frecuencia: Frecuencia,
    /// Next execution
    #[serde(with = "fecha")]
    pub fecha_ejecucion: NaiveDateTime,
    /// Whether the schedule is running
    #[serde(default)]
    pub activo: bool,
    /// Background job backing the schedule
    #[serde(default)]
    pub hangfire_job_id: Option<String>,
    /// Concept
    #[serde(default)]
    pub concepto_id: Option<EntityId>,
    /// Concept name, resolved by the server
    #[serde(default)]
    pub concepto_nombre: Option<String>,
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

/// Scheduled income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngresoProgramado {
    /// Server identifier
    pub id: EntityId,
    /// Amount in the account currency
    pub importe: f64,
    /// Free-text note
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Recurrence
    pub frecuencia: Frecuencia,
    /// Next execution
    #[serde(with = "fecha")]
    pub fecha_ejecucion: NaiveDateTime,
    /// Whether the schedule is running
    #[serde(default)]
    pub activo: bool,
    /// Background job backing the schedule
    #[serde(default)]
    pub hangfire_job_id: Option<String>,
    /// Concept
    #[serde(default)]
    pub concepto_id: Option<EntityId>,
    /// Concept name, resolved by the server
    #[serde(default)]
    pub concepto_nombre: Option<String>,
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

/// Scheduled transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraspasoProgramado {
    /// Server identifier
    pub id: EntityId,
    /// Amount in the account currency
    pub importe: f64,
    /// Free-text note
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Recurrence
    pub frecuencia: Frecuencia,
    /// Next execution
    #[serde(with = "fecha")]
    pub fecha_ejecucion: NaiveDateTime,
    /// Whether the schedule is running
    #[serde(default)]
    pub activo: bool,
    /// Background job backing the schedule
    #[serde(default)]
    pub hangfire_job_id: Option<String>,
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

/// Create/update payload for scheduled expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoGastoProgramado {
    /// Amount in the account currency
    pub importe: f64,
    /// Free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// Recurrence
    pub frecuencia: Frecuencia,
    /// Next execution
    #[serde(with = "fecha")]
    pub fecha_ejecucion: NaiveDateTime,
    /// Whether the schedule is running
    pub activo: bool,
    /// Concept
    pub concepto_id: Option<EntityId>,
    /// Supplier
    pub proveedor_id: Option<EntityId>,
    /// Person involved, if any
    pub persona_id: Option<EntityId>,
    /// Account charged or credited
    pub cuenta_id: Option<EntityId>,
    /// Payment method
    pub forma_pago_id: Option<EntityId>,
}

impl Validate for NuevoGastoProgramado {
    fn validate(&self) -> Result<(), ValidationError> {
        require_amount(self.importe)?;
        require_id(self.concepto_id.as_ref(), "concepto")?;
        require_id(self.cuenta_id.as_ref(), "cuenta")
    }
}

/// Create/update payload for scheduled incomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoIngresoProgramado {
    /// Amount in the account currency
    pub importe: f64,
    /// Free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// Recurrence
    pub frecuencia: Frecuencia,
    /// Next execution
    #[serde(with = "fecha")]
    pub fecha_ejecucion: NaiveDateTime,
    /// Whether the schedule is running
    pub activo: bool,
    /// Concept
    pub concepto_id: Option<EntityId>,
    /// Client
    pub cliente_id: Option<EntityId>,
    /// Person involved, if any
    pub persona_id: Option<EntityId>,
    /// Account charged or credited
    pub cuenta_id: Option<EntityId>,
    /// Payment method
    pub forma_pago_id: Option<EntityId>,
}

impl Validate for NuevoIngresoProgramado {
    fn validate(&self) -> Result<(), ValidationError> {
        require_amount(self.importe)?;
        require_id(self.concepto_id.as_ref(), "concepto")?;
        require_id(self.cuenta_id.as_ref(), "cuenta")
    }
}

/// Create/update payload for scheduled transfers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoTraspasoProgramado {
    /// Amount in the account currency
    pub importe: f64,
    /// Free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// Recurrence
    pub frecuencia: Frecuencia,
    /// Next execution
    #[serde(with = "fecha")]
    pub fecha_ejecucion: NaiveDateTime,
    /// Whether the schedule is running
    pub activo: bool,
    /// Source account
    pub cuenta_origen_id: Option<EntityId>,
    /// Destination account
    pub cuenta_destino_id: Option<EntityId>,
}

impl Validate for NuevoTraspasoProgramado {
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

    fn at(raw: &str) -> NaiveDateTime {
        fecha::parse(raw).unwrap()
    }

    #[test]
    fn frecuencia_wire_names() {
        assert_eq!(serde_json::to_string(&Frecuencia::Mensual).unwrap(), "\"MENSUAL\"");
        let f: Frecuencia = serde_json::from_str("\"SEMANAL\"").unwrap();
        assert_eq!(f, Frecuencia::Semanal);
        assert_eq!("anual".parse::<Frecuencia>().unwrap(), Frecuencia::Anual);
        assert!("QUINCENAL".parse::<Frecuencia>().is_err());
    }

    #[test]
    fn next_occurrence() {
        let base = at("2024-01-31T08:00:00");
        assert_eq!(Frecuencia::Diario.next_after(base), Some(at("2024-02-01T08:00:00")));
        assert_eq!(Frecuencia::Semanal.next_after(base), Some(at("2024-02-07T08:00:00")));
        // clamped to the end of February in a leap year
        assert_eq!(Frecuencia::Mensual.next_after(base), Some(at("2024-02-29T08:00:00")));
        assert_eq!(Frecuencia::Anual.next_after(base), Some(at("2025-01-31T08:00:00")));
    }

    #[test]
    fn gasto_programado_from_backend_json() {
        let json = r#"{
            "id": "gp1",
            "importe": 9.99,
            "frecuencia": "MENSUAL",
            "fechaEjecucion": "2024-06-01T00:00:00",
            "activo": true,
            "hangfireJobId": "recurring-gp1",
            "cuentaId": "a1"
        }"#;
        let gp: GastoProgramado = serde_json::from_str(json).unwrap();

        assert!(gp.activo);
        assert_eq!(gp.frecuencia, Frecuencia::Mensual);
        assert_eq!(gp.hangfire_job_id.as_deref(), Some("recurring-gp1"));
    }
}
