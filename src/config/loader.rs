//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Base URL of the authentication backend.
pub const ENV_BACKEND_URL: &str = "DEMO_SERVICE_URL";
/// Validation call deadline in milliseconds.
pub const ENV_AUTH_TIMEOUT_MS: &str = "AUTH_TIMEOUT_MS";
pub const ENV_SERVICE_HOST: &str = "SERVICE_HOST";
pub const ENV_SERVICE_PORT: &str = "SERVICE_PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from an optional TOML file plus the
/// process environment.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] but reads overrides through `lookup`.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<GateConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GateConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`. Unset or blank variables
/// leave the existing value untouched.
pub fn apply_env_overrides<F>(config: &mut GateConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_BACKEND_URL) {
        config.auth.backend_url = Some(url);
    }

    if let Some(raw) = get(ENV_AUTH_TIMEOUT_MS) {
        config.auth.timeout_ms = raw.trim().parse().map_err(|e| ConfigError::Env {
            var: ENV_AUTH_TIMEOUT_MS,
            reason: format!("{e}"),
        })?;
    }

    let host = get(ENV_SERVICE_HOST);
    let port = match get(ENV_SERVICE_PORT) {
        Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| ConfigError::Env {
            var: ENV_SERVICE_PORT,
            reason: format!("{e}"),
        })?),
        None => None,
    };

    if host.is_some() || port.is_some() {
        let (current_host, current_port) = config
            .listener
            .bind_address
            .rsplit_once(':')
            .unwrap_or(("0.0.0.0", "8000"));
        let host = host.unwrap_or_else(|| current_host.to_string());
        let port = port.map_or_else(|| current_port.to_string(), |p| p.to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    Ok(())
}
