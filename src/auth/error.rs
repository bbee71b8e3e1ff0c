//! Gate rejections and their HTTP mapping.
//!
//! Bodies follow the `{"detail": "..."}` shape used by the rest of the task
//! API. The 500 body is fixed; the underlying cause is only logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::validator::BackendError;

pub const MISSING_TOKEN_DETAIL: &str = "Session token is missing";
pub const INVALID_TOKEN_DETAIL: &str = "Invalid or expired session token";
pub const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error";

/// Every way the gate can refuse a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `session_token` header, or an empty one. The backend is not called.
    #[error("session token is missing")]
    MissingToken,

    /// The backend rejected the token.
    #[error("session token is invalid or expired")]
    InvalidOrExpiredToken,

    /// The validation call failed.
    #[error("token validation failed: {0}")]
    ValidationTransport(#[from] BackendError),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidOrExpiredToken => StatusCode::UNAUTHORIZED,
            Self::ValidationTransport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> &'static str {
        match self {
            Self::MissingToken => MISSING_TOKEN_DETAIL,
            Self::InvalidOrExpiredToken => INVALID_TOKEN_DETAIL,
            Self::ValidationTransport(_) => INTERNAL_ERROR_DETAIL,
        }
    }

    /// Metric label for this rejection.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidOrExpiredToken => "rejected",
            Self::ValidationTransport(_) => "errored",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
