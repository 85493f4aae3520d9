//! Bland Mock API
//!
//! A configuration-driven mock server. REST endpoints and a GraphQL schema are
//! declared in TOML or YAML files and served with canned, optionally
//! templated, responses.
//!
//! # Features
//!
//! - **Multi-Method Paths**: Several methods per path, with 405 and `Allow` for the rest
//! - **Directory Patterns**: Paths ending in `/` match everything below them
//! - **Response Templates**: `{{path}}`, `{{method}}`, `{{query.NAME}}` and `{{body}}`
//! - **Latency Simulation**: Fixed per-endpoint delays
//! - **GraphQL**: Object types, queries and mutations returning canned JSON
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [[endpoints]]
//! path = "/api/users"
//! method = "GET"
//! response = '{"users": []}'
//!
//! [graphql]
//! enabled = true
//!
//! [[graphql.types]]
//! name = "User"
//! fields = { id = "Int!", name = "String!" }
//!
//! [[graphql.queries]]
//! name = "users"
//! return_type = "[User]"
//! response = '[{"id": 1, "name": "Ada"}]'
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod graphql;
pub mod matcher;
pub mod registry;
pub mod request;
pub mod response;
pub mod server;
pub mod template;

pub use config::{ConfigLoader, EndpointDescriptor, MockApiConfig};
pub use dispatcher::{RequestDispatcher, RouteHandler};
pub use registry::EndpointRegistry;
pub use request::MockRequest;
pub use response::MockResponse;
