//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     controller (Arc<dyn …Controller>)
//!     → api::{pet, store, user}::routes (fixed scheme, declaration order)
//!     → table.rs (parse templates, reject duplicates)
//!     → router.rs (mount tables in registration order)
//!     → Freeze as immutable Router
//!
//! Incoming Request (method, path):
//!     → router.rs (select tables by mount prefix)
//!     → matcher.rs (match templates, capture parameters)
//!     → Return: Matched route, MethodNotAllowed or NotFound
//!     → route.rs (invoke handler with Invocation)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration, then declaration)

pub mod error;
pub mod matcher;
pub mod route;
pub mod router;
pub mod table;

pub use error::{DispatchError, RouteTableError, TableIssue};
pub use matcher::{MountPrefix, PathParams, PathTemplate, TemplateError};
pub use route::{bind, Handler, Incoming, Invocation, Reply, Route};
pub use router::{Resolution, Router, RouterBuilder};
pub use table::{RouteTable, RouteTableBuilder};
