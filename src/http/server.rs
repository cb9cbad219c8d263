//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single catch-all handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Strip the configured base path and enforce the body limit
//! - Hand every request to the Petstore [`Router`]
//! - Record per-operation metrics
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json,
};
use http_body_util::LengthLimitError;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::{DispatchError, Incoming, Router};

/// Label used for requests that matched no route.
const UNMATCHED: &str = "unmatched";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub base_path: Arc<str>,
    pub max_body_bytes: usize,
}

/// HTTP server exposing the Petstore API.
pub struct HttpServer {
    app: axum::Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `router` with the given configuration.
    pub fn new(config: ServerConfig, router: Arc<Router>) -> Self {
        let state = AppState {
            router,
            base_path: Arc::from(config.api.base_path.trim_end_matches('/')),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let app = Self::build_app(&config, state);
        Self { app, config }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = request.headers().request_id().unwrap_or("-"),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered app, for driving requests without a socket.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.api.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Strip `base` from `path` on a segment boundary. An empty base matches everything.
fn strip_base_path<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(path);
    }
    match path.strip_prefix(base) {
        Some("") => Some("/"),
        Some(rest) if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

/// Map a failed body read: over the limit is 413, anything else is 400.
fn body_error_response(err: axum::Error, limit: usize) -> Response {
    let inner = err.into_inner();
    let (status, code, message) = if inner.is::<LengthLimitError>() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            format!("request body exceeds {limit} bytes"),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            "invalid_body",
            format!("failed to read request body: {inner}"),
        )
    };
    tracing::warn!(error = %inner, status = %status, "Request body rejected");
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Catch-all handler: resolve against the Petstore router and invoke.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method;
    let full_path = parts.uri.path().to_string();

    let Some(path) = strip_base_path(&state.base_path, &full_path) else {
        let err = DispatchError::RouteNotFound {
            method,
            path: full_path,
        };
        let response = err.into_response();
        metrics::record_request(UNMATCHED, response.status().as_u16(), start_time);
        return response;
    };
    let path = path.to_string();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let response = body_error_response(e, state.max_body_bytes);
            metrics::record_request(UNMATCHED, response.status().as_u16(), start_time);
            return response;
        }
    };

    let mut incoming = Incoming::new(method, path)
        .with_headers(parts.headers)
        .with_body(body);
    if let Some(query) = parts.uri.query() {
        incoming = incoming.with_query(query);
    }

    let resolution = state.router.resolve(&incoming.method, &incoming.path);
    let operation = resolution.operation().unwrap_or(UNMATCHED);
    tracing::debug!(
        operation,
        method = %incoming.method,
        path = %incoming.path,
        "Dispatching request"
    );

    let response = match resolution.invoke(incoming).await {
        Ok(reply) => reply.into_response(),
        Err(err) => err.into_response(),
    };

    metrics::record_request(operation, response.status().as_u16(), start_time);
    response
}
