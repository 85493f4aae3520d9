//! REST endpoint registry.
//!
//! Maps each registered path to its per-method endpoint table and produces
//! responses for requests routed to one of those paths.

use crate::config::EndpointDescriptor;
use crate::error::RegistryError;
use crate::matcher::PathPattern;
use crate::request::MockRequest;
use crate::response::{MockResponse, APPLICATION_JSON};
use crate::template::TemplateEngine;
use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Registered endpoints, keyed by path then method.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    /// Every registration, in order
    endpoints: Vec<EndpointDescriptor>,
    /// path -> method -> descriptor
    table: HashMap<String, HashMap<String, EndpointDescriptor>>,
    /// One pattern per distinct path, in first-registration order
    patterns: Vec<PathPattern>,
    templates: TemplateEngine,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one endpoint.
    ///
    /// An empty method becomes `GET` and methods are upper-cased. A status of
    /// zero or below becomes 200. Registering the same path and method again
    /// replaces the earlier descriptor.
    pub fn register(&mut self, mut descriptor: EndpointDescriptor) -> Result<(), RegistryError> {
        if descriptor.path.is_empty() {
            return Err(RegistryError::EmptyPath);
        }
        if descriptor.method.is_empty() {
            descriptor.method = "GET".to_string();
        }
        descriptor.method = descriptor.method.to_uppercase();
        if descriptor.status <= 0 {
            descriptor.status = 200;
        }

        let methods = self
            .table
            .entry(descriptor.path.clone())
            .or_insert_with(|| {
                self.patterns.push(PathPattern::new(&descriptor.path));
                HashMap::new()
            });
        if methods
            .insert(descriptor.method.clone(), descriptor.clone())
            .is_some()
        {
            warn!(
                method = %descriptor.method,
                path = %descriptor.path,
                "Endpoint re-registered, replacing earlier definition"
            );
        }

        info!(
            method = %descriptor.method,
            path = %descriptor.path,
            status = descriptor.status,
            "Registered endpoint"
        );
        self.endpoints.push(descriptor);
        Ok(())
    }

    /// Register endpoints in order, stopping at the first failure.
    pub fn register_all<I>(&mut self, endpoints: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = EndpointDescriptor>,
    {
        for endpoint in endpoints {
            self.register(endpoint)?;
        }
        Ok(())
    }

    /// Every registered descriptor, in registration order.
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    /// Distinct registered paths, in first-registration order.
    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    /// Descriptor currently served for `path` and `method`.
    pub fn lookup(&self, path: &str, method: &str) -> Option<&EndpointDescriptor> {
        self.table.get(path)?.get(method)
    }

    /// Sorted methods registered for `path`.
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        let mut allowed: Vec<String> = self
            .table
            .get(path)
            .map(|methods| methods.keys().cloned().collect())
            .unwrap_or_default();
        allowed.sort();
        allowed
    }

    /// Respond to a request routed to the registered `path`.
    pub async fn dispatch(&self, path: &str, request: &MockRequest) -> MockResponse {
        let Some(methods) = self.table.get(path) else {
            return MockResponse::not_found(&request.path, &request.method);
        };

        match methods.get(&request.method) {
            Some(endpoint) => self.respond(endpoint, request).await,
            None => {
                let allowed = self.allowed_methods(path);
                warn!(
                    method = %request.method,
                    path = %request.path,
                    allowed = ?allowed,
                    "Method not allowed"
                );
                MockResponse::method_not_allowed(&allowed, &request.method)
            }
        }
    }

    async fn respond(&self, endpoint: &EndpointDescriptor, request: &MockRequest) -> MockResponse {
        let delay = u64::try_from(endpoint.delay).unwrap_or(0);
        if delay > 0 {
            debug!(path = %endpoint.path, delay_ms = delay, "Applying delay");
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        // Only 100..=599 is served as configured.
        let status = u16::try_from(endpoint.status)
            .ok()
            .filter(|s| (100..=599).contains(s))
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or_else(|| {
                warn!(status = endpoint.status, path = %endpoint.path, "Invalid status code");
                StatusCode::INTERNAL_SERVER_ERROR
            });

        let mut response = MockResponse::new(status);
        for (name, value) in &endpoint.headers {
            response.set_header(name, value);
        }
        if !response.headers.contains_key(CONTENT_TYPE) {
            response
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }
        response.body = self.templates.render(&endpoint.response, request);
        response
    }
}
