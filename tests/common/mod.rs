//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use session_gate::config::{AuthConfig, GateConfig};
use session_gate::http::HttpServer;
use session_gate::lifecycle::Shutdown;

/// One call observed by the mock auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCall {
    pub token: Option<String>,
    pub request_id: Option<String>,
}

/// Handle to a running mock authentication backend.
#[derive(Clone)]
pub struct MockAuthBackend {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<BackendCall>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockAuthBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Start a programmable auth backend. `f` receives the `session_token`
/// header (if any) and returns the status to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockAuthBackend
where
    F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let backend = MockAuthBackend {
        addr,
        calls: Arc::new(Mutex::new(Vec::new())),
        in_flight: Arc::new(AtomicUsize::new(0)),
        max_in_flight: Arc::new(AtomicUsize::new(0)),
    };

    let f = Arc::new(f);
    let state = backend.clone();
    let app = Router::new().fallback(move |headers: HeaderMap| {
        let f = f.clone();
        let state = state.clone();
        async move {
            let header = |name: &str| {
                headers
                    .get(name)
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            };
            let token = header("session_token");
            state.calls.lock().unwrap().push(BackendCall {
                token: token.clone(),
                request_id: header("x-request-id"),
            });

            let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            state.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let status = f(token).await;
            state.in_flight.fetch_sub(1, Ordering::SeqCst);

            StatusCode::from_u16(status).unwrap()
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    backend
}

/// Backend that accepts `good-token`, expires `old-token`, and rejects the rest.
pub async fn start_standard_backend() -> MockAuthBackend {
    start_programmable_backend(|token| async move {
        match token.as_deref() {
            Some("good-token") => 200,
            Some("old-token") => 419,
            _ => 401,
        }
    })
    .await
}

/// An address nothing is listening on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Handle to a running gate in front of the test task routes.
pub struct RunningGate {
    pub addr: SocketAddr,
    pub handler_calls: Arc<AtomicUsize>,
    shutdown: Shutdown,
}

impl RunningGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn handler_calls(&self) -> usize {
        self.handler_calls.load(Ordering::SeqCst)
    }
}

impl Drop for RunningGate {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Downstream routes standing in for the task API.
pub fn task_routes(handler_calls: Arc<AtomicUsize>) -> Router {
    let get_calls = handler_calls.clone();
    let post_calls = handler_calls;
    Router::new()
        .route(
            "/test-middleware",
            get(move || {
                let calls = get_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "message": "success" }))
                }
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "too late"
            }),
        )
        .route(
            "/tasks",
            post(move |headers: HeaderMap, body: Bytes| {
                let calls = post_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let custom = headers
                        .get("x-task-tag")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    (
                        StatusCode::CREATED,
                        [("x-task-tag", custom)],
                        body,
                    )
                }
            }),
        )
}

pub fn gate_config(backend_url: &str, timeout_ms: u64) -> GateConfig {
    let mut auth = AuthConfig::with_backend(backend_url);
    auth.timeout_ms = timeout_ms;
    GateConfig {
        auth,
        ..GateConfig::default()
    }
}

/// Start a gate with the given config on an ephemeral port.
pub async fn start_gate(config: GateConfig) -> RunningGate {
    let handler_calls = Arc::new(AtomicUsize::new(0));
    let server = HttpServer::new(config, task_routes(handler_calls.clone())).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    RunningGate {
        addr,
        handler_calls,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
