//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the Petstore router over the in-memory controllers
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::lifecycle::Shutdown;
use crate::memory;
use crate::observability::metrics;
use crate::routing::RouteTableError;

/// Failure during startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build router: {0}")]
    Router(#[from] RouteTableError),

    #[error("invalid address `{0}`")]
    Address(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build the HTTP server for `config` over fresh in-memory controllers.
pub fn build_server(config: ServerConfig) -> Result<HttpServer, StartupError> {
    let router = memory::router()?;
    let routes = router.routes().count();
    metrics::record_routes_mounted(routes);
    tracing::info!(
        tables = router.tables().count(),
        routes,
        "Petstore router ready"
    );
    Ok(HttpServer::new(config, Arc::new(router)))
}

/// Run the server until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = build_server(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
