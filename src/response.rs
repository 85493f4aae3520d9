//! Response values produced by the dispatcher, including the fixed error
//! bodies clients rely on.

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue, ALLOW, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

pub const APPLICATION_JSON: &str = "application/json";

/// A fully assembled response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Serialize)]
struct NotFoundBody<'a> {
    error: &'static str,
    path: &'a str,
    method: &'a str,
}

#[derive(Serialize)]
struct MethodNotAllowedBody<'a> {
    error: &'static str,
    allowed: &'a [String],
    received: &'a str,
}

#[derive(Serialize)]
struct HealthBody<'a> {
    status: &'static str,
    service: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl MockResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// Serialize `body` as a JSON response.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        let mut response = Self::new(status);
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        match serde_json::to_string(body) {
            Ok(body) => response.body = body,
            Err(e) => {
                warn!(error = %e, "Failed to serialize response body");
                response.status = StatusCode::INTERNAL_SERVER_ERROR;
            }
        }
        response
    }

    /// `{"error": "<message>"}`
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, &ErrorBody { error: message })
    }

    /// 404 for a path no registered pattern matches.
    pub fn not_found(path: &str, method: &str) -> Self {
        Self::json(
            StatusCode::NOT_FOUND,
            &NotFoundBody {
                error: "endpoint not found",
                path,
                method,
            },
        )
    }

    /// 405 listing the methods registered for the path.
    pub fn method_not_allowed(allowed: &[String], received: &str) -> Self {
        let mut response = Self::json(
            StatusCode::METHOD_NOT_ALLOWED,
            &MethodNotAllowedBody {
                error: "method not allowed",
                allowed,
                received,
            },
        );
        response.set_header(ALLOW.as_str(), &allowed.join(", "));
        response
    }

    /// 200 health check body.
    pub fn health(service: &str) -> Self {
        Self::json(
            StatusCode::OK,
            &HealthBody {
                status: "healthy",
                service,
            },
        )
    }

    /// Set a header from configuration. Invalid names or values are skipped.
    pub fn set_header(&mut self, name: &str, value: &str) {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                warn!(header = %name, error = %e, "Skipping invalid header name");
                return;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(e) => warn!(header = %name, error = %e, "Skipping invalid header value"),
        }
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
