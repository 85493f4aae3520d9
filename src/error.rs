//! Error types for endpoint registration and the GraphQL surface.

use thiserror::Error;

/// Errors raised while registering REST endpoints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("endpoint path cannot be empty")]
    EmptyPath,
}

/// Errors raised while building the GraphQL handler.
#[derive(Debug, Error)]
pub enum GraphQLError {
    #[error("GraphQL is not enabled")]
    Disabled,

    #[error("failed to build GraphQL schema: {0}")]
    SchemaBuild(String),
}

/// Errors raised by canned resolvers at execution time.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("invalid response JSON: {0}")]
    InvalidResponsePayload(#[from] serde_json::Error),
}
