//! Finanzas Core
//!
//! Shared vocabulary for the Finanzas client:
//! - Entity model (catalogs, transactions, scheduled transactions, users)
//! - Response envelopes used by the backend
//! - Pagination queries
//! - Navigation routes and toast notifications
//! - Client configuration
//!
//! # Example
//!
//! ```rust
//! use finanzas_core::{ClientConfig, PageQuery, SortOrder};
//!
//! let config = ClientConfig::default().with_api_url("https://api.example.com/api/v1");
//! let query = PageQuery::new(2, 25)
//!     .with_search("super")
//!     .with_sort("fecha", SortOrder::Desc);
//!
//! assert_eq!(config.api_url, "https://api.example.com/api/v1");
//! assert!(query.to_pairs().contains(&("sortOrder".to_string(), "desc".to_string())));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod envelope;
pub mod error;
pub mod model;
pub mod navigation;
pub mod notify;
pub mod query;

// Re-exports for convenience
pub use config::{CacheConfig, ClientConfig, SessionConfig, StoreConfig, UpdateConfig};
pub use envelope::{ApiEnvelope, ApiErrorBody, DataEnvelope, EnvelopeKind, Page};
pub use error::{ConfigError, EnvelopeError, ValidationError};
pub use model::{
    Categoria, Cliente, Concepto, Cuenta, EntityId, FormaPago, Frecuencia, Gasto,
    GastoProgramado, Ingreso, IngresoProgramado, LoginRequest, NuevaCuenta, NuevoCatalogo,
    NuevoConcepto, NuevoGasto, NuevoGastoProgramado, NuevoIngreso, NuevoIngresoProgramado,
    NuevoTraspaso, NuevoTraspasoProgramado, Persona, Proveedor, RegisterRequest, Traspaso,
    TraspasoProgramado, Usuario, Validate,
};
pub use navigation::{Navigator, Route, TracingNavigator};
pub use notify::{Notifier, TracingNotifier};
pub use query::{PageQuery, SortOrder};

#[cfg(any(test, feature = "mocks"))]
pub use navigation::MockNavigator;
#[cfg(any(test, feature = "mocks"))]
pub use notify::MockNotifier;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Finanzas entities
    pub use crate::{
        ClientConfig, EntityId, EnvelopeKind, Navigator, Notifier, Page, PageQuery, Route,
        SortOrder, Usuario, Validate,
    };
}
