//! Routing error types.
//!
//! Dispatch outcomes (`RouteNotFound`, `MethodNotAllowed`) are terminal values
//! handed back to the transport; controller failures pass through untouched.

use std::fmt;

use axum::http::Method;

use crate::controller::ControllerError;
use crate::routing::matcher::TemplateError;

/// Failure produced while dispatching a request.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No registered template matches the path.
    #[error("no route matches {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// A template matches the path but none is registered for the method.
    #[error("method {method} is not allowed for {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },

    /// Path, query or body could not be bound to the capability's typed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The capability result could not be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// Raised by the controller; never inspected or rewritten by the router.
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

impl DispatchError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// A route table failed validation when it was built.
///
/// Every problem found is reported, not just the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route table `{resource}`: {}", IssueList(.issues))]
pub struct RouteTableError {
    pub resource: &'static str,
    pub issues: Vec<TableIssue>,
}

/// A single problem found while building a route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableIssue {
    #[error("duplicate route {method} {template}")]
    DuplicateRoute { method: Method, template: String },

    #[error("malformed template `{template}`: {reason}")]
    MalformedTemplate {
        template: String,
        reason: TemplateError,
    },

    #[error("template `{template}` lies outside mount prefix `{prefix}`")]
    OutsidePrefix { template: String, prefix: String },
}

struct IssueList<'a>(&'a [TableIssue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}
