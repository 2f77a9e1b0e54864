//! One store per entity over a shared client

use crate::resource::Resource;
use crate::service::RestService;
use crate::store::EntityStore;
use finanzas_core::{
    Categoria, Cliente, Concepto, Cuenta, FormaPago, Gasto, GastoProgramado, Ingreso,
    IngresoProgramado, Persona, Proveedor, StoreConfig, Traspaso, TraspasoProgramado,
};
use finanzas_http::ApiClient;
use std::sync::Arc;

/// Store over the REST service for `E`
pub type RestStore<E> = EntityStore<E, RestService<E>>;

/// Categorías
pub type CategoriaStore = RestStore<Categoria>;
/// Conceptos
pub type ConceptoStore = RestStore<Concepto>;
/// Proveedores
pub type ProveedorStore = RestStore<Proveedor>;
/// Clientes
pub type ClienteStore = RestStore<Cliente>;
/// Personas
pub type PersonaStore = RestStore<Persona>;
/// Cuentas
pub type CuentaStore = RestStore<Cuenta>;
/// Formas de pago
pub type FormaPagoStore = RestStore<FormaPago>;
/// Gastos
pub type GastoStore = RestStore<Gasto>;
/// Ingresos
pub type IngresoStore = RestStore<Ingreso>;
/// Traspasos
pub type TraspasoStore = RestStore<Traspaso>;
/// Gastos programados
pub type GastoProgramadoStore = RestStore<GastoProgramado>;
/// Ingresos programados
pub type IngresoProgramadoStore = RestStore<IngresoProgramado>;
/// Traspasos programados
pub type TraspasoProgramadoStore = RestStore<TraspasoProgramado>;

/// Every entity store of the application
///
/// Fields are named after the REST collections they front.
#[derive(Debug, Clone)]
pub struct Stores {
    /// `/categorias`
    pub categorias: Arc<CategoriaStore>,
    /// `/conceptos`
    pub conceptos: Arc<ConceptoStore>,
    /// `/proveedores`
    pub proveedores: Arc<ProveedorStore>,
    /// `/clientes`
    pub clientes: Arc<ClienteStore>,
    /// `/personas`
    pub personas: Arc<PersonaStore>,
    /// `/cuentas`
    pub cuentas: Arc<CuentaStore>,
    /// `/formas-pago`
    pub formas_pago: Arc<FormaPagoStore>,
    /// `/gastos`
    pub gastos: Arc<GastoStore>,
    /// `/ingresos`
    pub ingresos: Arc<IngresoStore>,
    /// `/traspasos`
    pub traspasos: Arc<TraspasoStore>,
    /// `/gastos-programados`
    pub gastos_programados: Arc<GastoProgramadoStore>,
    /// `/ingresos-programados`
    pub ingresos_programados: Arc<IngresoProgramadoStore>,
    /// `/traspasos-programados`
    pub traspasos_programados: Arc<TraspasoProgramadoStore>,
}

fn store<E: Resource>(client: &ApiClient, config: &StoreConfig) -> Arc<RestStore<E>> {
    Arc::new(EntityStore::new(RestService::new(client.clone()), config))
}

impl Stores {
    /// Build all stores sharing `client`
    #[must_use]
    pub fn new(client: &ApiClient, config: &StoreConfig) -> Self {
        Self {
            categorias: store(client, config),
            conceptos: store(client, config),
            proveedores: store(client, config),
            clientes: store(client, config),
            personas: store(client, config),
            cuentas: store(client, config),
            formas_pago: store(client, config),
            gastos: store(client, config),
            ingresos: store(client, config),
            traspasos: store(client, config),
            gastos_programados: store(client, config),
            ingresos_programados: store(client, config),
            traspasos_programados: store(client, config),
        }
    }
}
