//! Top-level request dispatch.
//!
//! Routes each request to the health check, the GraphQL endpoint, or the
//! first registered endpoint path that matches, in that order.

use crate::config::{EndpointDescriptor, MockApiConfig};
use crate::error::RegistryError;
use crate::graphql::GraphQLHandler;
use crate::matcher::{find_first, PathPattern};
use crate::registry::EndpointRegistry;
use crate::request::MockRequest;
use crate::response::MockResponse;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const HEALTH_PATH: &str = "/health";

/// A handler mounted on its own path, outside the endpoint registry.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, request: &MockRequest) -> MockResponse;
}

struct MountedHandler {
    pattern: PathPattern,
    handler: Arc<dyn RouteHandler>,
}

struct HealthCheck {
    pattern: PathPattern,
    service: String,
}

enum Route<'a> {
    Health(&'a HealthCheck),
    Mounted(&'a MountedHandler),
    Endpoint(&'a str),
}

/// Entry point for every request the server receives.
///
/// Registration happens once at startup; dispatch only reads.
#[derive(Default)]
pub struct RequestDispatcher {
    registry: EndpointRegistry,
    health: Option<HealthCheck>,
    graphql: Option<MountedHandler>,
}

impl RequestDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire up the health check, every configured endpoint, and GraphQL when
    /// enabled.
    pub fn from_config(config: &MockApiConfig) -> anyhow::Result<Self> {
        let mut dispatcher = Self::new();
        dispatcher.register_health_check(config.server.service_name());
        dispatcher.register_endpoints(config.endpoints.iter().cloned())?;

        if config.graphql_enabled() {
            let handler = GraphQLHandler::new(config.graphql.as_ref())?;
            let path = handler.path().to_string();
            dispatcher.register_graphql(&path, Arc::new(handler));
        }

        info!(
            endpoints = dispatcher.endpoints().len(),
            graphql = dispatcher.graphql.is_some(),
            "Dispatcher ready"
        );
        Ok(dispatcher)
    }

    pub fn register(&mut self, descriptor: EndpointDescriptor) -> Result<(), RegistryError> {
        self.registry.register(descriptor)
    }

    pub fn register_endpoints<I>(&mut self, endpoints: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = EndpointDescriptor>,
    {
        self.registry.register_all(endpoints)
    }

    /// Answer `GET /health` with the given service name.
    pub fn register_health_check(&mut self, service: &str) {
        self.health = Some(HealthCheck {
            pattern: PathPattern::new(HEALTH_PATH),
            service: service.to_string(),
        });
        info!(path = HEALTH_PATH, "Registered health check endpoint");
    }

    /// Mount the GraphQL handler. An empty path mounts it on `/graphql`.
    pub fn register_graphql(&mut self, path: &str, handler: Arc<dyn RouteHandler>) {
        let path = if path.is_empty() {
            crate::config::DEFAULT_GRAPHQL_PATH
        } else {
            path
        };
        self.graphql = Some(MountedHandler {
            pattern: PathPattern::new(path),
            handler,
        });
        info!(path = %path, "Registered GraphQL endpoint");
    }

    /// Every registered endpoint, in registration order.
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        self.registry.endpoints()
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    fn route(&self, path: &str) -> Option<Route<'_>> {
        if let Some(health) = self.health.as_ref().filter(|h| h.pattern.matches(path)) {
            return Some(Route::Health(health));
        }
        if let Some(graphql) = self.graphql.as_ref().filter(|g| g.pattern.matches(path)) {
            return Some(Route::Mounted(graphql));
        }
        find_first(self.registry.patterns(), path).map(|p| Route::Endpoint(p.as_str()))
    }

    pub async fn dispatch(&self, request: &MockRequest) -> MockResponse {
        debug!(method = %request.method, path = %request.path, "Dispatching request");

        match self.route(&request.path) {
            Some(Route::Health(health)) => MockResponse::health(&health.service),
            Some(Route::Mounted(mounted)) => mounted.handler.handle(request).await,
            Some(Route::Endpoint(pattern)) => self.registry.dispatch(pattern, request).await,
            None => {
                warn!(method = %request.method, path = %request.path, "No matching endpoint");
                MockResponse::not_found(&request.path, &request.method)
            }
        }
    }
}
