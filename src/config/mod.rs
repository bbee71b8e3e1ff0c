//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config / GATE_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (DEMO_SERVICE_URL, SERVICE_HOST, ...)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → shared via Arc with the auth gate and server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields except the backend URL have defaults
//! - A missing backend URL is a startup error, never a per-request one

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AuthConfig, GateConfig, ListenerConfig, LogFormat, ObservabilityConfig, TimeoutConfig};
pub use validation::ValidationError;
