//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Ensure the authentication backend is configured and addressable
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GateConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("auth.backend_url is not set (DEMO_SERVICE_URL)")]
    MissingBackendUrl,

    #[error("auth.backend_url {url:?} is not a valid URL: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Resolve the full validation endpoint from the configured base URL and path.
///
/// A base without a scheme (`localhost:8001`) is treated as plain HTTP.
pub fn resolve_backend_url(base: &str, path: &str) -> Result<Url, url::ParseError> {
    let base = base.trim();
    let with_scheme = if base.contains("://") {
        base.to_string()
    } else {
        format!("http://{base}")
    };

    let joined = if path.is_empty() {
        with_scheme
    } else {
        format!(
            "{}/{}",
            with_scheme.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };

    let url = Url::parse(&joined)?;
    if url.host_str().is_none() {
        return Err(url::ParseError::EmptyHost);
    }
    Ok(url)
}

/// Check every semantic constraint on `config`.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.auth.backend_url.as_deref().map(str::trim) {
        None | Some("") => errors.push(ValidationError::MissingBackendUrl),
        Some(raw) => {
            if let Err(e) = resolve_backend_url(raw, &config.auth.validate_path) {
                errors.push(ValidationError::InvalidBackendUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if config.auth.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "auth.timeout_ms" });
    }
    if config.auth.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "auth.connect_timeout_ms" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
