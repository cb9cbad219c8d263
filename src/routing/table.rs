//! Per-resource route tables.
//!
//! # Responsibilities
//! - Collect route declarations for one resource in declaration order
//! - Validate templates, prefix containment and duplicates at build time
//! - Expose the routes as a restartable, ordered sequence
//!
//! # Design Decisions
//! - Declaration order is match precedence; nothing is sorted
//! - Duplicate detection compares template shape, so `/pet/{id}` and
//!   `/pet/{petId}` under the same method are rejected as duplicates
//! - Returns all validation issues, not just the first

use std::future::Future;

use axum::http::Method;

use crate::routing::error::{DispatchError, RouteTableError, TableIssue};
use crate::routing::matcher::{MountPrefix, PathTemplate};
use crate::routing::route::{boxed, Handler, Invocation, Reply, Route};

/// Ordered, immutable routes of one resource, mounted under one prefix.
#[derive(Debug, Clone)]
pub struct RouteTable {
    resource: &'static str,
    prefix: MountPrefix,
    routes: Vec<Route>,
}

impl RouteTable {
    /// Start declaring the routes of `resource`, mounted at `prefix`.
    pub fn builder(resource: &'static str, prefix: &str) -> RouteTableBuilder {
        RouteTableBuilder {
            resource,
            prefix: MountPrefix::new(prefix),
            declarations: Vec::new(),
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn prefix(&self) -> &MountPrefix {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in declaration order. Can be called any number of times.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Declaration {
    method: Method,
    template: String,
    operation: &'static str,
    handler: Handler,
}

/// Builder collecting route declarations; validated on [`RouteTableBuilder::build`].
pub struct RouteTableBuilder {
    resource: &'static str,
    prefix: MountPrefix,
    declarations: Vec<Declaration>,
}

impl RouteTableBuilder {
    /// Declare a route. Order of calls is match order.
    pub fn route<F, Fut>(
        mut self,
        method: Method,
        template: &str,
        operation: &'static str,
        handler: F,
    ) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, DispatchError>> + Send + 'static,
    {
        self.declarations.push(Declaration {
            method,
            template: template.to_string(),
            operation,
            handler: boxed(handler),
        });
        self
    }

    pub fn get<F, Fut>(self, template: &str, operation: &'static str, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, DispatchError>> + Send + 'static,
    {
        self.route(Method::GET, template, operation, handler)
    }

    pub fn post<F, Fut>(self, template: &str, operation: &'static str, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, DispatchError>> + Send + 'static,
    {
        self.route(Method::POST, template, operation, handler)
    }

    pub fn put<F, Fut>(self, template: &str, operation: &'static str, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, DispatchError>> + Send + 'static,
    {
        self.route(Method::PUT, template, operation, handler)
    }

    pub fn delete<F, Fut>(self, template: &str, operation: &'static str, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, DispatchError>> + Send + 'static,
    {
        self.route(Method::DELETE, template, operation, handler)
    }

    /// Validate every declaration and freeze the table.
    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut issues = Vec::new();
        let mut routes: Vec<Route> = Vec::with_capacity(self.declarations.len());

        for decl in self.declarations {
            let template = match PathTemplate::parse(&decl.template) {
                Ok(t) => t,
                Err(reason) => {
                    issues.push(TableIssue::MalformedTemplate {
                        template: decl.template,
                        reason,
                    });
                    continue;
                }
            };

            if !self.prefix.covers(template.as_str()) {
                issues.push(TableIssue::OutsidePrefix {
                    template: decl.template,
                    prefix: self.prefix.as_str().to_string(),
                });
                continue;
            }

            let duplicate = routes
                .iter()
                .any(|r| *r.method() == decl.method && r.template().same_shape(&template));
            if duplicate {
                issues.push(TableIssue::DuplicateRoute {
                    method: decl.method,
                    template: decl.template,
                });
                continue;
            }

            routes.push(Route::new(decl.method, template, decl.operation, decl.handler));
        }

        if !issues.is_empty() {
            return Err(RouteTableError {
                resource: self.resource,
                issues,
            });
        }

        tracing::debug!(
            resource = self.resource,
            prefix = %self.prefix,
            routes = routes.len(),
            "Route table built"
        );

        Ok(RouteTable {
            resource: self.resource,
            prefix: self.prefix,
            routes,
        })
    }
}
