//! Finanzas App
//!
//! Facade assembling the Finanzas client:
//! - Interceptor chain in its fixed order (loading, credentials, error, cache)
//! - Session manager wired to the session-expiry broadcast
//! - One optimistic store per entity
//! - Update poller asking before switching versions
//!
//! # Example
//!
//! ```rust,no_run
//! use finanzas_app::FinanzasApp;
//! use finanzas_core::{ClientConfig, LoginRequest, PageQuery, TracingNavigator, TracingNotifier};
//! use finanzas_http::MemoryStorage;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), finanzas_app::AppError> {
//! let app = FinanzasApp::new(
//!     ClientConfig::default(),
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(TracingNavigator),
//!     Arc::new(TracingNotifier),
//! )?;
//!
//! app.login(&LoginRequest::new("ana@example.com", "secreto")).await?;
//! app.stores().gastos.load_page(PageQuery::new(1, 10)).await?;
//! app.logout().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod app;
pub mod error;
pub mod update;

// Re-exports for convenience
pub use app::FinanzasApp;
pub use error::AppError;
pub use update::{ReloadHook, UpdateCheck, UpdatePrompt, UpdateWatcher, UPDATE_QUESTION};

#[cfg(any(test, feature = "mocks"))]
pub use update::MockUpdatePrompt;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for applications embedding the client
    pub use crate::{AppError, FinanzasApp, UpdateCheck, UpdatePrompt, UpdateWatcher};
    pub use finanzas_auth::GuardOutcome;
    pub use finanzas_store::{EntityStore, ListState, Stores};
}
