//! Finanzas Store
//!
//! Entity state for the Finanzas client:
//! - [`Resource`] metadata for every REST collection
//! - [`RestService`] implementing [`CrudService`] and [`ScheduledService`]
//! - [`EntityStore`], one generic optimistic store per entity
//! - Debounced search through [`SearchBox`]
//!
//! # Example
//!
//! ```rust,no_run
//! use finanzas_core::{NuevoCatalogo, PageQuery, StoreConfig};
//! use finanzas_http::ApiClient;
//! use finanzas_store::Stores;
//!
//! # async fn run(client: ApiClient) -> Result<(), finanzas_store::StoreError> {
//! let stores = Stores::new(&client, &StoreConfig::default());
//! stores.categorias.load_page(PageQuery::new(1, 10)).await?;
//! stores.categorias.create(&NuevoCatalogo::new("Viajes")).await?;
//!
//! let state = stores.categorias.state();
//! println!("{} de {}", state.items.len(), state.total_records);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod debounce;
pub mod error;
pub mod resource;
pub mod service;
pub mod state;
pub mod store;
pub mod stores;

// Re-exports for convenience
pub use debounce::{debounce, SearchBox, SearchResults, SEARCH_DEBOUNCE};
pub use error::{Action, StoreError};
pub use resource::{Resource, Scheduled};
pub use service::{CrudService, RestService, ScheduledService};
pub use state::ListState;
pub use store::{DeletePolicy, EntityStore};
pub use stores::*;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for entity stores
    pub use crate::{CrudService, EntityStore, ListState, Resource, Scheduled, StoreError, Stores};
}
