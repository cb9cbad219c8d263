//! Rendering dispatch outcomes as HTTP responses.
//!
//! # Responsibilities
//! - Render a successful [`Reply`] (JSON body or empty 200)
//! - Map every [`DispatchError`] to a status code and JSON error body
//!
//! # Design Decisions
//! - Error body is `{"error": <code>, "message": <text>}`
//! - 405 responses carry an `Allow` header in declaration order
//! - Server errors are logged; their message is not echoed to the client

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::controller::ControllerError;
use crate::routing::{DispatchError, Reply};

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(value) => (StatusCode::OK, Json(value)).into_response(),
            Reply::Empty => StatusCode::OK.into_response(),
        }
    }
}

/// HTTP status for a dispatch failure.
pub fn status_code(err: &DispatchError) -> StatusCode {
    match err {
        DispatchError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        DispatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DispatchError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DispatchError::Controller(e) => match e {
            ControllerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ControllerError::NotFound(_) => StatusCode::NOT_FOUND,
            ControllerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ControllerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// Stable machine-readable code for a dispatch failure.
pub fn error_code(err: &DispatchError) -> &'static str {
    match err {
        DispatchError::RouteNotFound { .. } => "route_not_found",
        DispatchError::MethodNotAllowed { .. } => "method_not_allowed",
        DispatchError::InvalidInput(_) => "invalid_input",
        DispatchError::Encode(_) => "encode_error",
        DispatchError::Controller(e) => match e {
            ControllerError::InvalidInput(_) => "invalid_input",
            ControllerError::NotFound(_) => "not_found",
            ControllerError::Validation(_) => "validation_failed",
            ControllerError::Internal(_) => "internal_error",
        },
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let code = error_code(&self);

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, Json(json!({ "error": code, "message": message }))).into_response();

        if let DispatchError::MethodNotAllowed { allowed, .. } = &self {
            let allow = allowed
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                DispatchError::RouteNotFound {
                    method: Method::GET,
                    path: "/x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (DispatchError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (
                ControllerError::not_found("pet 1").into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ControllerError::validation("name").into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ControllerError::Internal("db".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(status_code(&err), expected, "{err}");
        }
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = DispatchError::MethodNotAllowed {
            method: Method::PATCH,
            path: "/pet/1".into(),
            allowed: vec![Method::GET, Method::POST, Method::DELETE],
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST, DELETE");
    }

    #[test]
    fn test_empty_reply_is_ok() {
        let response = Reply::Empty.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
