//! Builds an executable schema from a [`GraphQLConfig`].
//!
//! Building happens in two passes. The first records every declared type
//! name; the second builds objects and root fields, resolving type references
//! against those names. A reference the schema cannot satisfy falls back to
//! `String` and is recorded as a warning instead of failing the build.

use crate::config::{GraphQLConfig, GraphQLTypeConfig, OperationConfig};
use crate::error::GraphQLError;
use crate::graphql::resolver::{property_field, CannedResponse};
use crate::graphql::signature::{ScalarKind, TypeSignature};
use async_graphql::dynamic::{Field, InputValue, Object, Schema, TypeRef};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

pub const QUERY_TYPE_NAME: &str = "RootQuery";
pub const MUTATION_TYPE_NAME: &str = "RootMutation";

/// An executable mock schema.
pub struct MockSchema {
    schema: Schema,
    warnings: Vec<String>,
    type_count: usize,
    query_count: usize,
    mutation_count: usize,
}

impl MockSchema {
    /// Build from configuration. The `enabled` flag is not consulted here.
    pub fn build(config: &GraphQLConfig) -> Result<Self, GraphQLError> {
        SchemaBuilder::new(config).build()
    }

    pub async fn execute(&self, request: async_graphql::Request) -> async_graphql::Response {
        self.schema.execute(request).await
    }

    /// Type references that fell back to `String`.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_mutations(&self) -> bool {
        self.mutation_count > 0
    }

    pub fn type_count(&self) -> usize {
        self.type_count
    }

    pub fn query_count(&self) -> usize {
        self.query_count
    }

    pub fn mutation_count(&self) -> usize {
        self.mutation_count
    }

    /// Schema in SDL form.
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

impl std::fmt::Debug for MockSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSchema")
            .field("types", &self.type_count)
            .field("queries", &self.query_count)
            .field("mutations", &self.mutation_count)
            .field("warnings", &self.warnings)
            .finish()
    }
}

struct SchemaBuilder<'a> {
    config: &'a GraphQLConfig,
    declared: BTreeSet<&'a str>,
    warnings: Vec<String>,
}

impl<'a> SchemaBuilder<'a> {
    fn new(config: &'a GraphQLConfig) -> Self {
        let declared = config.types.iter().map(|t| t.name.as_str()).collect();
        Self {
            config,
            declared,
            warnings: Vec::new(),
        }
    }

    fn build(mut self) -> Result<MockSchema, GraphQLError> {
        let config = self.config;

        // Later declarations of the same name replace earlier ones.
        let mut types: BTreeMap<&str, Object> = BTreeMap::new();
        for type_config in &config.types {
            let object = self.build_object(type_config);
            types.insert(type_config.name.as_str(), object);
        }

        let mut query = Object::new(QUERY_TYPE_NAME);
        for op in &config.queries {
            query = query.field(self.build_operation(op, "query"));
        }
        if config.queries.is_empty() {
            return Err(GraphQLError::SchemaBuild(format!(
                "{QUERY_TYPE_NAME} must define at least one field"
            )));
        }

        // An empty mutation root is invalid, so only build it when needed.
        let mutation = if config.mutations.is_empty() {
            None
        } else {
            let mut mutation = Object::new(MUTATION_TYPE_NAME);
            for op in &config.mutations {
                mutation = mutation.field(self.build_operation(op, "mutation"));
            }
            Some(mutation)
        };

        let type_count = types.len();
        let mut builder = Schema::build(
            QUERY_TYPE_NAME,
            mutation.as_ref().map(|_| MUTATION_TYPE_NAME),
            None,
        )
        .register(query);
        if let Some(mutation) = mutation {
            builder = builder.register(mutation);
        }
        for object in types.into_values() {
            builder = builder.register(object);
        }

        let schema = builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuild(e.to_string()))?;

        debug!(
            types = type_count,
            queries = config.queries.len(),
            mutations = config.mutations.len(),
            warnings = self.warnings.len(),
            "Built GraphQL schema"
        );

        Ok(MockSchema {
            schema,
            warnings: self.warnings,
            type_count,
            query_count: config.queries.len(),
            mutation_count: config.mutations.len(),
        })
    }

    fn build_object(&mut self, type_config: &GraphQLTypeConfig) -> Object {
        let mut object = Object::new(type_config.name.as_str());
        if !type_config.description.is_empty() {
            object = object.description(type_config.description.as_str());
        }
        for (field_name, signature) in &type_config.fields {
            let context = format!("field '{}.{}'", type_config.name, field_name);
            let ty = self.output_type(signature, &context);
            object = object.field(
                property_field(field_name.as_str(), ty)
                    .description(format!("Field {field_name} of type {signature}")),
            );
        }
        object
    }

    fn build_operation(&mut self, op: &OperationConfig, kind: &str) -> Field {
        let context = format!("{} '{}'", kind, op.name);
        let ty = self.output_type(&op.return_type, &context);

        let mut field = CannedResponse::new(op.response.as_str()).into_field(op.name.as_str(), ty);
        if !op.description.is_empty() {
            field = field.description(op.description.as_str());
        }
        for (arg_name, signature) in &op.args {
            let arg_context = format!("argument '{}' of {}", arg_name, context);
            field = field.argument(InputValue::new(
                arg_name.as_str(),
                self.input_type(signature, &arg_context),
            ));
        }
        field
    }

    /// Output position: scalars or declared object types.
    fn output_type(&mut self, signature: &str, context: &str) -> TypeRef {
        let parsed = TypeSignature::parse(signature);
        if let Some(scalar) = parsed.scalar() {
            return parsed.wrap(scalar.type_name());
        }
        if self.declared.contains(parsed.base_name.as_str()) {
            return parsed.wrap(&parsed.base_name);
        }
        self.fall_back(&parsed, signature, context)
    }

    /// Input position: scalars only, object types are not valid inputs.
    fn input_type(&mut self, signature: &str, context: &str) -> TypeRef {
        let parsed = TypeSignature::parse(signature);
        match parsed.scalar() {
            Some(scalar) => parsed.wrap(scalar.type_name()),
            None => self.fall_back(&parsed, signature, context),
        }
    }

    fn fall_back(&mut self, parsed: &TypeSignature, signature: &str, context: &str) -> TypeRef {
        warn!(
            signature = %signature,
            context = %context,
            "Unknown GraphQL type, using String"
        );
        self.warnings
            .push(format!("unknown type '{signature}' for {context}, using String"));
        parsed.wrap(ScalarKind::String.type_name())
    }
}
