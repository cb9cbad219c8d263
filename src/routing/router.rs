//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Hold the mounted route tables in registration order
//! - Resolve (method, path) to a route, `MethodNotAllowed` or `NotFound`
//! - Invoke the resolved route's capability
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Candidate tables selected by segment-aware mount prefix
//! - O(n) template scan over candidate tables (acceptable for API-sized tables)
//! - First match wins, in registration then declaration order; never most-specific
//! - Explicit `NotFound` / `MethodNotAllowed` rather than a silent default
//! - `HEAD` falls back to the matching `GET` route

use axum::http::Method;

use crate::routing::error::DispatchError;
use crate::routing::matcher::PathParams;
use crate::routing::route::{Incoming, Invocation, Reply, Route};
use crate::routing::table::RouteTable;

/// Result of resolving a request against the mounted tables.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Route matched with its captured parameters.
    Matched { route: &'a Route, params: PathParams },
    /// Path matched but method not allowed; methods in declaration order.
    MethodNotAllowed { allowed: Vec<Method> },
    /// No template matches the path.
    NotFound,
}

impl<'a> Resolution<'a> {
    /// Operation id of the matched route, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Resolution::Matched { route, .. } => Some(route.operation()),
            _ => None,
        }
    }

    /// Run the matched capability, or turn the miss into its terminal error.
    pub async fn invoke(self, incoming: Incoming) -> Result<Reply, DispatchError> {
        match self {
            Resolution::Matched { route, params } => {
                route.call(Invocation::from_incoming(params, incoming)).await
            }
            Resolution::MethodNotAllowed { allowed } => Err(DispatchError::MethodNotAllowed {
                method: incoming.method,
                path: incoming.path,
                allowed,
            }),
            Resolution::NotFound => Err(DispatchError::RouteNotFound {
                method: incoming.method,
                path: incoming.path,
            }),
        }
    }
}

/// Composite router over several resource route tables.
#[derive(Debug, Clone, Default)]
pub struct Router {
    tables: Vec<RouteTable>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Mounted tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &RouteTable> + Clone {
        self.tables.iter()
    }

    /// Every mounted route, in the order dispatch considers them.
    pub fn routes(&self) -> impl Iterator<Item = &Route> + Clone {
        self.tables.iter().flat_map(RouteTable::iter)
    }

    /// Resolve a request. Pure lookup: never mutates the router, never blocks.
    ///
    /// `HEAD` is served by the first matching `GET` route unless a `HEAD`
    /// route is declared for the path.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut allowed: Vec<Method> = Vec::new();
        let mut head_fallback = None;

        let candidates = self.tables.iter().filter(|t| t.prefix().covers(path));
        for table in candidates {
            for route in table {
                let Some(params) = route.template().matches(path) else {
                    continue;
                };
                if route.method() == method {
                    return Resolution::Matched { route, params };
                }
                if *method == Method::HEAD
                    && *route.method() == Method::GET
                    && head_fallback.is_none()
                {
                    head_fallback = Some((route, params));
                    continue;
                }
                if !allowed.contains(route.method()) {
                    allowed.push(route.method().clone());
                }
            }
        }

        if let Some((route, params)) = head_fallback {
            return Resolution::Matched { route, params };
        }
        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed { allowed }
        }
    }

    /// Resolve and invoke. Controller failures come back unchanged.
    pub async fn dispatch(&self, incoming: Incoming) -> Result<Reply, DispatchError> {
        let resolution = self.resolve(&incoming.method, &incoming.path);
        if let Some(operation) = resolution.operation() {
            tracing::debug!(
                operation,
                method = %incoming.method,
                path = %incoming.path,
                "Route resolved"
            );
        }
        resolution.invoke(incoming).await
    }
}

/// Collects route tables in registration order.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    tables: Vec<RouteTable>,
}

impl RouterBuilder {
    /// Mount a table under its own prefix. Several tables may share a prefix;
    /// the earlier one wins where their templates overlap.
    pub fn mount(mut self, table: RouteTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn build(self) -> Router {
        tracing::debug!(
            tables = self.tables.len(),
            routes = self.tables.iter().map(RouteTable::len).sum::<usize>(),
            "Router built"
        );
        Router {
            tables: self.tables,
        }
    }
}
