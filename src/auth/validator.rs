//! Remote token validation against the authentication backend.
//!
//! # Wire contract
//! `GET {backend_url}{validate_path}` with the token in a `session_token`
//! header. Only the response status is inspected:
//!
//! | Backend status    | Result                              |
//! |-------------------|-------------------------------------|
//! | 2xx               | `Ok(Valid)`                         |
//! | 401, 403          | `Ok(Invalid)`                       |
//! | 410, 419, 440     | `Ok(Expired)`                       |
//! | anything else     | `Err(UnexpectedStatus)`             |
//! | connect / timeout | `Err(Unreachable)` / `Err(Timeout)` |
//!
//! Redirects are not followed, so every check is exactly one round trip.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

use crate::auth::token::{SessionToken, SESSION_TOKEN_HEADER};
use crate::config::validation::resolve_backend_url;
use crate::config::AuthConfig;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;

/// What the backend said about a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid,
    Expired,
}

impl ValidationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
        }
    }
}

/// The validation call itself failed; no verdict on the token exists.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("auth backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error("auth backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("auth backend returned unexpected status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("auth backend misconfigured: {0}")]
    Setup(String),
}

impl BackendError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Unreachable(_) => "unreachable",
            Self::UnexpectedStatus(_) => "unexpected_status",
            Self::Setup(_) => "setup",
        }
    }
}

/// Seam between the gate and whatever decides token validity.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Ask the backend about `token`. Called exactly once per gated request.
    async fn validate(
        &self,
        token: &SessionToken,
        request_id: Option<&str>,
    ) -> Result<ValidationOutcome, BackendError>;
}

/// Map a backend response status onto a validation result.
pub fn classify_status(status: StatusCode) -> Result<ValidationOutcome, BackendError> {
    match status.as_u16() {
        200..=299 => Ok(ValidationOutcome::Valid),
        401 | 403 => Ok(ValidationOutcome::Invalid),
        410 | 419 | 440 => Ok(ValidationOutcome::Expired),
        _ => Err(BackendError::UnexpectedStatus(status)),
    }
}

/// [`TokenValidator`] that calls the configured HTTP backend.
///
/// Holds a single pooled `reqwest::Client`, shared by every request.
#[derive(Debug, Clone)]
pub struct HttpTokenValidator {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpTokenValidator {
    pub fn new(config: &AuthConfig) -> Result<Self, BackendError> {
        let base = config
            .backend_url
            .as_deref()
            .ok_or_else(|| BackendError::Setup("backend_url is not set".into()))?;
        let endpoint = resolve_backend_url(base, &config.validate_path)
            .map_err(|e| BackendError::Setup(format!("{base}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(Policy::none())
            .build()
            .map_err(|e| BackendError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    async fn validate(
        &self,
        token: &SessionToken,
        request_id: Option<&str>,
    ) -> Result<ValidationOutcome, BackendError> {
        let start = Instant::now();

        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(SESSION_TOKEN_HEADER, token.header_value().clone());
        if let Some(id) = request_id {
            request = request.header(X_REQUEST_ID.as_str(), id);
        }

        let result = match request.send().await {
            Ok(response) => classify_status(response.status()),
            Err(e) if e.is_timeout() => Err(BackendError::Timeout(self.timeout)),
            Err(e) => Err(BackendError::Unreachable(e)),
        };

        let label = match &result {
            Ok(outcome) => outcome.as_str(),
            Err(e) => e.as_str(),
        };
        metrics::record_backend_call(label, start);

        result
    }
}
