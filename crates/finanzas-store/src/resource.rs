//! Per-entity REST metadata

use chrono::NaiveDateTime;
use finanzas_core::{
    Categoria, Cliente, Concepto, Cuenta, EntityId, EnvelopeKind, FormaPago, Gasto,
    GastoProgramado, Ingreso, IngresoProgramado, NuevaCuenta, NuevoCatalogo, NuevoConcepto,
    NuevoGasto, NuevoGastoProgramado, NuevoIngreso, NuevoIngresoProgramado, NuevoTraspaso,
    NuevoTraspasoProgramado, Persona, Proveedor, Traspaso, TraspasoProgramado, Validate,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// An entity served under one REST collection
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Create/update payload
    type Input: Serialize + Validate + Send + Sync + 'static;

    /// Collection path relative to the API base
    const PATH: &'static str;
    /// Envelope the collection answers with
    const ENVELOPE: EnvelopeKind;
    /// Singular Spanish noun used in messages
    const LABEL: &'static str;

    /// Server-assigned id
    fn id(&self) -> &EntityId;
}

/// Scheduled transactions: can be paused and rescheduled
pub trait Scheduled: Resource {
    /// Whether the schedule runs
    fn activo(&self) -> bool;
    /// Pause or resume locally
    fn set_activo(&mut self, activo: bool);
    /// Move the next execution locally
    fn set_fecha_ejecucion(&mut self, fecha: NaiveDateTime);
}

macro_rules! resource {
    ($entity:ty, $input:ty, $path:literal, $envelope:ident, $label:literal) => {
        impl Resource for $entity {
            type Input = $input;

            const PATH: &'static str = $path;
            const ENVELOPE: EnvelopeKind = EnvelopeKind::$envelope;
            const LABEL: &'static str = $label;

            fn id(&self) -> &EntityId {
                &self.id
            }
        }
    };
}

macro_rules! scheduled {
    ($entity:ty) => {
        impl Scheduled for $entity {
            fn activo(&self) -> bool {
                self.activo
            }

            fn set_activo(&mut self, activo: bool) {
                self.activo = activo;
            }

            fn set_fecha_ejecucion(&mut self, fecha: NaiveDateTime) {
                self.fecha_ejecucion = fecha;
            }
        }
    };
}

resource!(Categoria, NuevoCatalogo, "/categorias", Result, "categoría");
resource!(Concepto, NuevoConcepto, "/conceptos", Result, "concepto");
resource!(Proveedor, NuevoCatalogo, "/proveedores", Result, "proveedor");
resource!(Cliente, NuevoCatalogo, "/clientes", Result, "cliente");
resource!(Persona, NuevoCatalogo, "/personas", Result, "persona");
resource!(Cuenta, NuevaCuenta, "/cuentas", Result, "cuenta");
resource!(FormaPago, NuevoCatalogo, "/formas-pago", Result, "forma de pago");
resource!(Gasto, NuevoGasto, "/gastos", Result, "gasto");
resource!(Ingreso, NuevoIngreso, "/ingresos", Result, "ingreso");
resource!(Traspaso, NuevoTraspaso, "/traspasos", Result, "traspaso");
resource!(
    GastoProgramado,
    NuevoGastoProgramado,
    "/gastos-programados",
    Data,
    "gasto programado"
);
resource!(
    IngresoProgramado,
    NuevoIngresoProgramado,
    "/ingresos-programados",
    Data,
    "ingreso programado"
);
resource!(
    TraspasoProgramado,
    NuevoTraspasoProgramado,
    "/traspasos-programados",
    Data,
    "traspaso programado"
);

scheduled!(GastoProgramado);
scheduled!(IngresoProgramado);
scheduled!(TraspasoProgramado);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_and_envelopes() {
        assert_eq!(Categoria::PATH, "/categorias");
        assert_eq!(FormaPago::PATH, "/formas-pago");
        assert_eq!(Gasto::ENVELOPE, EnvelopeKind::Result);
        assert_eq!(TraspasoProgramado::PATH, "/traspasos-programados");
        assert_eq!(GastoProgramado::ENVELOPE, EnvelopeKind::Data);
    }
}
