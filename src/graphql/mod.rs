//! GraphQL endpoint backed by canned responses.
//!
//! Object types, queries and mutations are declared in configuration. The
//! schema is built once at startup and executed by `async-graphql`.

pub mod handler;
pub mod resolver;
pub mod schema;
pub mod signature;

pub use handler::GraphQLHandler;
pub use resolver::CannedResponse;
pub use schema::MockSchema;
pub use signature::{ScalarKind, TypeSignature};
