//! Finanzas Auth
//!
//! Token-based session lifecycle for the Finanzas client:
//! - JWT payload decoding (no signature verification)
//! - Login, registration, logout and session restore
//! - Route guards for authentication and roles
//!
//! # Example
//!
//! ```rust,no_run
//! use finanzas_auth::{auth_guard, AuthSession, GuardOutcome};
//! use finanzas_core::{LoginRequest, SessionConfig};
//! # async fn run(session: AuthSession) -> Result<(), finanzas_auth::AuthError> {
//! let usuario = session.login(&LoginRequest::new("ana@example.com", "secreto")).await?;
//! println!("Hola, {}", usuario.nombre);
//!
//! assert_eq!(auth_guard(&session, &SessionConfig::default(), "/gastos"), GuardOutcome::Allow);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod guard;
pub mod jwt;
pub mod session;

// Re-exports for convenience
pub use error::{AuthError, TokenError};
pub use guard::{auth_guard, GuardOutcome, RoleGuard};
pub use jwt::{decode_claims, usuario_from_claims, Claims};
pub use session::{AuthSession, LoginResponse, LOGIN_PATH, REGISTER_PATH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
