//! Petstore API router library.
//!
//! A composite router that binds the Petstore operations of three resource
//! controllers (pet, store, user) to HTTP method and path templates, plus the
//! HTTP server, configuration and observability around it.

pub mod api;
pub mod config;
pub mod controller;
pub mod http;
pub mod lifecycle;
pub mod memory;
pub mod model;
pub mod observability;
pub mod routing;

pub use api::api_router;
pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{DispatchError, Incoming, Reply, Router};
