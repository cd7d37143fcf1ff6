//! HTTP server setup and the proxy pipeline handler.
//!
//! # Responsibilities
//! - Create the Axum router and wire up the decorator stack
//! - Run the server with graceful shutdown
//! - Drive each request through the pipeline:
//!   CORS negotiation → target resolution → forwarding → response writer
//!
//! # Design Decisions
//! - Every pipeline branch is terminal and renders exactly once through
//!   `reply::render`
//! - The decorator order is fixed: trace → request ID → inbound timeout
//!   → license → handler

use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::forward::Forwarder;
use crate::http::middleware::license::license_middleware;
use crate::http::middleware::request_id::{request_id_middleware, X_REQUEST_ID};
use crate::http::reply::{self, Reply};
use crate::http::{cors, target};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let forwarder = Forwarder::new(
            Duration::from_secs(config.timeouts.upstream_secs),
            config.limits.max_body_bytes,
        );
        let state = AppState { forwarder };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(axum::middleware::from_fn(license_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(axum::middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
///
/// State machine per request: Received → {PreflightShortCircuit |
/// ResolutionFailed | Forwarded | forwarding failure} → ResponseWritten.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "proxy request"
    );

    // CORS negotiation; pre-flight probes are answered right here.
    let mut negotiated = HeaderMap::new();
    if cors::negotiate(&mut negotiated, &method, request.headers()) {
        return reply::render(Reply::preflight(), negotiated);
    }

    let target = match target::resolve(&method, &path) {
        Ok(target) => target,
        Err(err) => return reply::render(err.into(), negotiated),
    };

    match state
        .forwarder
        .forward(method, &target, request.into_body())
        .await
    {
        Ok(relayed) => reply::render(relayed, negotiated),
        Err(err) => reply::render(err.into(), negotiated),
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
