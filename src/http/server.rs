//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the downstream task API router with the auth gate
//! - Wire up middleware (tracing, request ID, handler timeout)
//! - Bind server to listener
//! - Stop serving when the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, middleware, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::gate::{auth_gate_middleware, AuthGate};
use crate::auth::validator::{BackendError, TokenValidator};
use crate::config::GateConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::ShutdownSignal;

/// HTTP server for the gated task API.
pub struct HttpServer {
    router: Router,
    config: Arc<GateConfig>,
}

impl HttpServer {
    /// Create a server whose gate calls the HTTP backend from `config`.
    ///
    /// `downstream` holds the business routes; every one of them, and its
    /// fallback, sits behind the gate.
    pub fn new(config: GateConfig, downstream: Router) -> Result<Self, BackendError> {
        let gate = AuthGate::from_config(&config.auth)?;
        Ok(Self::with_gate(config, downstream, gate))
    }

    /// Create a server around an arbitrary validator.
    pub fn with_validator(
        config: GateConfig,
        downstream: Router,
        validator: Arc<dyn TokenValidator>,
    ) -> Self {
        Self::with_gate(config, downstream, AuthGate::new(validator))
    }

    fn with_gate(config: GateConfig, downstream: Router, gate: AuthGate) -> Self {
        let config = Arc::new(config);
        let router = Self::build_router(&config, downstream, Arc::new(gate));
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, downstream: Router, gate: Arc<AuthGate>) -> Router {
        // Inside the gate: bounds the task handler only. The backend call
        // has its own deadline (`auth.timeout_ms`).
        downstream
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(gate, auth_gate_middleware))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = request_id(request.headers()).unwrap_or("unknown"),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
