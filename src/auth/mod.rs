//! Session authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Request headers
//!     → token.rs (extract `session_token`)
//!     → validator.rs (one GET to the auth backend, status classified)
//!     → gate.rs (forward to next handler, or short-circuit)
//!     → error.rs (401 / 500 JSON bodies)
//! ```
//!
//! # Design Decisions
//! - Exactly one backend call per request that carries a token
//! - No retries, no caching of verdicts
//! - Every failure is answered here; downstream never sees one

pub mod error;
pub mod gate;
pub mod token;
pub mod validator;

pub use error::AuthError;
pub use gate::{auth_gate_middleware, AuthGate};
pub use token::{SessionToken, SESSION_TOKEN_HEADER};
pub use validator::{BackendError, HttpTokenValidator, TokenValidator, ValidationOutcome};
