//! Route bindings and the values flowing through a handler.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use futures_util::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::routing::error::DispatchError;
use crate::routing::matcher::{PathParams, PathTemplate};

/// Type-erased route handler.
pub type Handler =
    Arc<dyn Fn(Invocation) -> BoxFuture<'static, Result<Reply, DispatchError>> + Send + Sync>;

/// One (method, path template, handler) binding. Immutable once built.
#[derive(Clone)]
pub struct Route {
    method: Method,
    template: PathTemplate,
    operation: &'static str,
    handler: Handler,
}

impl Route {
    pub(crate) fn new(
        method: Method,
        template: PathTemplate,
        operation: &'static str,
        handler: Handler,
    ) -> Self {
        Self {
            method,
            template,
            operation,
            handler,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Operation identifier of the bound capability (e.g. `getPetById`).
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Invoke the bound capability.
    pub fn call(&self, invocation: Invocation) -> BoxFuture<'static, Result<Reply, DispatchError>> {
        (self.handler)(invocation)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

/// Erase a concrete async handler into a [`Handler`].
pub(crate) fn boxed<F, Fut>(handler: F) -> Handler
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply, DispatchError>> + Send + 'static,
{
    Arc::new(move |invocation| handler(invocation).boxed())
}

/// Bind a shared controller to a handler function taking `(controller, invocation)`.
///
/// ```ignore
/// RouteTable::builder("pet", "/pet")
///     .get("/pet/{petId}", "getPetById", bind(&controller, get_pet_by_id))
/// ```
pub fn bind<C, F, Fut>(
    controller: &Arc<C>,
    handler: F,
) -> impl Fn(Invocation) -> Fut + Send + Sync + 'static
where
    C: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<C>, Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply, DispatchError>> + Send + 'static,
{
    let controller = Arc::clone(controller);
    move |invocation| handler(Arc::clone(&controller), invocation)
}

/// Request data as received from the transport, before resolution.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Incoming {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self.with_body(body))
    }
}

/// Everything a resolved handler needs to bind its capability's inputs.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    params: PathParams,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
}

impl Invocation {
    pub fn new(params: PathParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub(crate) fn from_incoming(params: PathParams, incoming: Incoming) -> Self {
        let query = incoming
            .query
            .as_deref()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self {
            params,
            query,
            headers: incoming.headers,
            body: incoming.body,
        }
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Parse a required route parameter into `T`.
    pub fn parse_param<T: FromStr>(&self, name: &str) -> Result<T, DispatchError> {
        let raw = self
            .param(name)
            .ok_or_else(|| DispatchError::invalid_input(format!("missing path parameter `{name}`")))?;
        raw.parse().map_err(|_| {
            DispatchError::invalid_input(format!("invalid value `{raw}` for path parameter `{name}`"))
        })
    }

    /// First value of a query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn require_query(&self, name: &str) -> Result<&str, DispatchError> {
        self.query(name)
            .ok_or_else(|| DispatchError::invalid_input(format!("missing query parameter `{name}`")))
    }

    /// All values of a repeated or comma-separated query parameter.
    pub fn query_list(&self, name: &str) -> Vec<String> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .flat_map(|(_, v)| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Get a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DispatchError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| DispatchError::invalid_input(format!("invalid request body: {e}")))
    }

    /// Look up a field in a form-urlencoded body, falling back to the query string.
    pub fn form_field(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(&self.body)
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .or_else(|| self.query(name).map(str::to_string))
    }
}

/// Successful capability result, before the transport renders it.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(serde_json::Value),
    Empty,
}

impl Reply {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, DispatchError> {
        serde_json::to_value(value)
            .map(Reply::Json)
            .map_err(DispatchError::Encode)
    }
}
