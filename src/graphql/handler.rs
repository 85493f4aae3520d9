//! HTTP handler for the GraphQL endpoint.

use crate::config::GraphQLConfig;
use crate::dispatcher::RouteHandler;
use crate::error::GraphQLError;
use crate::graphql::schema::MockSchema;
use crate::request::MockRequest;
use crate::response::MockResponse;
use async_graphql::Variables;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Body of a GraphQL request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQLRequestBody {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    operation_name: Option<String>,
    #[serde(default)]
    variables: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Serves GraphQL requests against a schema built from configuration.
#[derive(Debug)]
pub struct GraphQLHandler {
    schema: MockSchema,
    path: String,
}

impl GraphQLHandler {
    /// Build the handler. Fails when the section is absent or disabled, or
    /// when the schema cannot be built.
    pub fn new(config: Option<&GraphQLConfig>) -> Result<Self, GraphQLError> {
        let config = match config {
            Some(config) if config.enabled => config,
            _ => return Err(GraphQLError::Disabled),
        };

        let schema = MockSchema::build(config)?;
        info!(
            path = %config.path(),
            types = schema.type_count(),
            queries = schema.query_count(),
            mutations = schema.mutation_count(),
            "GraphQL schema ready"
        );

        Ok(Self {
            schema,
            path: config.path().to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn schema(&self) -> &MockSchema {
        &self.schema
    }
}

#[async_trait]
impl RouteHandler for GraphQLHandler {
    async fn handle(&self, request: &MockRequest) -> MockResponse {
        if request.method != "POST" {
            return MockResponse::error(
                StatusCode::METHOD_NOT_ALLOWED,
                "GraphQL endpoint only accepts POST requests",
            );
        }

        let body: GraphQLRequestBody = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Rejecting malformed GraphQL request");
                return MockResponse::error(
                    StatusCode::BAD_REQUEST,
                    &format!("invalid request body: {e}"),
                );
            }
        };

        let mut gql_request = async_graphql::Request::new(body.query.unwrap_or_default());
        if let Some(name) = body.operation_name.filter(|n| !n.is_empty()) {
            gql_request = gql_request.operation_name(name);
        }
        if let Some(variables) = body.variables {
            gql_request =
                gql_request.variables(Variables::from_json(serde_json::Value::Object(variables)));
        }

        let response = self.schema.execute(gql_request).await;
        if response.is_err() {
            let messages: Vec<_> = response.errors.iter().map(|e| e.message.as_str()).collect();
            warn!(errors = ?messages, "GraphQL errors");
        }

        MockResponse::json(StatusCode::OK, &response)
    }
}
