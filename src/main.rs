//! Petstore API server.
//!
//! Serves the Swagger Petstore operations over HTTP, dispatching through the
//! composite router onto in-memory controllers.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing::Router ──▶ api bindings ──▶ controller
//!                          │                                                     │
//!     Client Response      ▼                                                     │
//!     ◀────────────── http::response ◀──────────── Reply / DispatchError ◀───────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use petstore_router::config::{read_config, validate_config, ConfigError, ServerConfig};
use petstore_router::lifecycle::startup;
use petstore_router::memory;
use petstore_router::observability::logging;

#[derive(Parser)]
#[command(name = "petstore-router")]
#[command(about = "Petstore API server built on a composite route table", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override api.base_path.
    #[arg(long)]
    base_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the API (default)
    Serve,
    /// Print every mounted route in dispatch order
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(base_path) = cli.base_path {
        config.api.base_path = base_path;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes => {
            let router = memory::router()?;
            for route in router.routes() {
                println!(
                    "{:<7} {}{:<40} {}",
                    route.method().as_str(),
                    config.api.base_path,
                    route.template().as_str(),
                    route.operation()
                );
            }
        }
        Commands::Serve => {
            logging::init(&config.observability);
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                bind_address = %config.listener.bind_address,
                request_timeout_secs = config.timeouts.request_secs,
                "petstore-router starting"
            );
            startup::run(config).await?;
        }
    }

    Ok(())
}
