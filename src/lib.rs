//! Session-token gate for the task management API.
//!
//! Every inbound request must carry a `session_token` header, which is
//! checked against an external authentication backend before the request
//! reaches any task route.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use auth::{AuthError, AuthGate, HttpTokenValidator, SessionToken, TokenValidator, ValidationOutcome};
pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownSignal};
