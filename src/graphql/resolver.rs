//! Canned resolvers.
//!
//! Root operations return a fixed JSON payload regardless of arguments. The
//! payload is parsed on every execution, so a malformed payload only fails the
//! field that returns it. Fields of custom object types read the property of
//! the same name from their parent value.

use crate::error::ResolverError;
use async_graphql::dynamic::{Field, FieldFuture, FieldValue, TypeRef};
use async_graphql::Value;
use std::sync::Arc;

/// A fixed response payload for one query or mutation.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    payload: Arc<str>,
}

impl CannedResponse {
    pub fn new(payload: impl Into<Arc<str>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Parse the payload into an engine value.
    pub fn resolve(&self) -> Result<Value, ResolverError> {
        Ok(serde_json::from_str(&self.payload)?)
    }

    /// A root field named `name` that resolves to this payload.
    pub fn into_field(self, name: impl Into<String>, ty: TypeRef) -> Field {
        Field::new(name, ty, move |_ctx| {
            let canned = self.clone();
            FieldFuture::new(async move {
                let value = canned.resolve()?;
                Ok(Some(FieldValue::value(value)))
            })
        })
    }
}

/// An object field resolved from the parent's property `name`.
pub fn property_field(name: impl Into<String>, ty: TypeRef) -> Field {
    let name: String = name.into();
    let key = name.clone();
    Field::new(name, ty, move |ctx| {
        let key = key.clone();
        FieldFuture::new(async move {
            let value = match ctx.parent_value.as_value() {
                Some(Value::Object(map)) => map.get(key.as_str()).cloned(),
                _ => None,
            };
            Ok(value.map(FieldValue::value))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Name;

    #[test]
    fn test_resolve_object() {
        let canned = CannedResponse::new(r#"{"id": 1, "name": "Test"}"#);
        let value = canned.resolve().unwrap();
        match value {
            Value::Object(map) => {
                assert_eq!(map.get(&Name::new("name")), Some(&Value::from("Test")));
                assert_eq!(map.get(&Name::new("id")), Some(&Value::from(1)));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_any_shape() {
        assert_eq!(CannedResponse::new("[1, 2]").resolve().unwrap(), Value::List(vec![1.into(), 2.into()]));
        assert_eq!(CannedResponse::new(r#""hello""#).resolve().unwrap(), Value::from("hello"));
        assert_eq!(CannedResponse::new("true").resolve().unwrap(), Value::from(true));
        assert_eq!(CannedResponse::new("null").resolve().unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_payload() {
        let err = CannedResponse::new("{not json").resolve().unwrap_err();
        assert!(matches!(err, ResolverError::InvalidResponsePayload(_)));
        assert!(err.to_string().starts_with("invalid response JSON"));
    }

    #[test]
    fn test_payload_kept_verbatim() {
        let canned = CannedResponse::new(r#"{"a":1}"#);
        assert_eq!(canned.payload(), r#"{"a":1}"#);
    }
}
