//! HTTP transport for the Petstore router.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, base path, body limit)
//!     → request.rs (request ID generated or propagated)
//!     → routing::Router (resolve + invoke capability)
//!     → response.rs (Reply / DispatchError → status + JSON)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
