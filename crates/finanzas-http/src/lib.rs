//! Finanzas HTTP
//!
//! Request pipeline for the Finanzas client:
//! - [`Transport`] abstraction with a `reqwest` implementation
//! - Ordered [`Interceptor`] chain (loading counter, credentials, error mapping, GET cache)
//! - Session storage for the auth cookie and local items
//! - Spanish user-facing error messages
//!
//! # Example
//!
//! ```rust,no_run
//! use finanzas_http::{ApiClient, Chain, ErrorInterceptor, ReqwestTransport};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), finanzas_http::HttpError> {
//! let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(30))?);
//! let chain = Chain::new(transport).with(Arc::new(ErrorInterceptor::new()));
//! let client = ApiClient::new("http://localhost:5000/api/v1", Arc::new(chain));
//!
//! let categorias = client.get_json("/categorias/recent", vec![("limit".into(), "5".into())]).await?;
//! println!("{categorias}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod chain;
pub mod client;
pub mod credentials;
pub mod error;
pub mod error_mapping;
pub mod loading;
pub mod messages;
pub mod request;
pub mod storage;
pub mod transport;

// Re-exports for convenience
pub use cache::{CacheInterceptor, CachedResponse, GetCache};
pub use chain::{Chain, Interceptor, Next};
pub use client::{decode, ApiClient};
pub use credentials::{CredentialsInterceptor, RedirectGate};
pub use error::{HttpError, StorageError};
pub use error_mapping::ErrorInterceptor;
pub use loading::{LoadingGuard, LoadingInterceptor, LoadingTracker};
pub use messages::user_message_for;
pub use request::{HttpRequest, HttpResponse, Method};
pub use storage::{
    Cookie, FileStorage, MemoryStorage, SameSite, SessionStorage, AUTH_COOKIE, TOKEN_EXPIRES_AT,
    USER_DATA,
};
pub use transport::{ReqwestTransport, Transport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for HTTP plumbing
    pub use crate::{
        ApiClient, Chain, HttpError, HttpRequest, HttpResponse, Interceptor, Method, Next,
        SessionStorage, Transport,
    };
}
