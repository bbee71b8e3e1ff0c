//! Session authentication middleware.
//!
//! # Per-request state machine
//! ```text
//! Start ──no token──────────────────────────────▶ Rejected (401)
//!   │
//!   ▼
//! TokenExtracted ─▶ Validating ─┬─ valid ───────▶ Forwarded (next handler)
//!                               ├─ invalid/expired ▶ Rejected (401)
//!                               └─ call failed ───▶ Errored (500)
//! ```
//!
//! Nothing is shared between requests except the validator (and its
//! connection pool). There are no retries and no result cache.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::error::AuthError;
use crate::auth::token::SessionToken;
use crate::auth::validator::{BackendError, HttpTokenValidator, TokenValidator, ValidationOutcome};
use crate::config::AuthConfig;
use crate::http::request::request_id;
use crate::observability::metrics;

/// Gate that admits a request only after the backend accepts its token.
#[derive(Clone)]
pub struct AuthGate {
    validator: Arc<dyn TokenValidator>,
}

impl AuthGate {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }

    /// Build a gate backed by the HTTP validator described in `config`.
    pub fn from_config(config: &AuthConfig) -> Result<Self, BackendError> {
        Ok(Self::new(Arc::new(HttpTokenValidator::new(config)?)))
    }

    /// Run extraction and remote validation for one request.
    ///
    /// `Ok` means the request may be forwarded.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = SessionToken::from_headers(headers).ok_or(AuthError::MissingToken)?;

        match self.validator.validate(&token, request_id(headers)).await? {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid | ValidationOutcome::Expired => {
                Err(AuthError::InvalidOrExpiredToken)
            }
        }
    }
}

/// Axum middleware wrapping every downstream route.
///
/// On success the original request goes to `next` untouched and its
/// response is returned as-is.
pub async fn auth_gate_middleware(
    State(gate): State<Arc<AuthGate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).unwrap_or("unknown").to_string();

    match gate.authenticate(request.headers()).await {
        Ok(()) => {
            tracing::debug!(request_id = %request_id, method = %method, path = %path, "Session validated, forwarding");
            metrics::record_decision("forwarded");
            next.run(request).await
        }
        Err(err @ AuthError::ValidationTransport(_)) => {
            tracing::error!(request_id = %request_id, method = %method, path = %path, error = %err, "Session validation failed");
            metrics::record_decision(err.outcome());
            err.into_response()
        }
        Err(err) => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, reason = %err, "Request rejected");
            metrics::record_decision(err.outcome());
            err.into_response()
        }
    }
}
