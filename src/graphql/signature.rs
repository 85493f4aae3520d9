//! Compact type signatures such as `Int!`, `[User]` or `[String]!`.
//!
//! A trailing `!` is stripped first, then one pair of enclosing brackets, so
//! `[String]!` is a non-null list of nullable strings. Only one level of
//! wrapping is recognized.

use async_graphql::dynamic::TypeRef;

/// A parsed type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSignature {
    pub base_name: String,
    pub is_list: bool,
    pub is_non_null: bool,
}

/// Built-in GraphQL scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
    Id,
}

impl ScalarKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(ScalarKind::String),
            "Int" => Some(ScalarKind::Int),
            "Float" => Some(ScalarKind::Float),
            "Boolean" => Some(ScalarKind::Boolean),
            "ID" => Some(ScalarKind::Id),
            _ => None,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ScalarKind::String => TypeRef::STRING,
            ScalarKind::Int => TypeRef::INT,
            ScalarKind::Float => TypeRef::FLOAT,
            ScalarKind::Boolean => TypeRef::BOOLEAN,
            ScalarKind::Id => TypeRef::ID,
        }
    }
}

impl TypeSignature {
    /// Parse a signature. Never fails; unknown names are kept as custom
    /// references for the schema builder to resolve.
    pub fn parse(signature: &str) -> Self {
        let (rest, is_non_null) = match signature.strip_suffix('!') {
            Some(rest) => (rest, true),
            None => (signature, false),
        };

        let (base, is_list) = if rest.len() > 2 && rest.starts_with('[') && rest.ends_with(']') {
            (&rest[1..rest.len() - 1], true)
        } else {
            (rest, false)
        };

        Self {
            base_name: base.to_string(),
            is_list,
            is_non_null,
        }
    }

    /// The scalar this signature names, if it is not a custom reference.
    pub fn scalar(&self) -> Option<ScalarKind> {
        ScalarKind::from_name(&self.base_name)
    }

    /// Apply this signature's list and non-null wrapping to `base`.
    pub fn wrap(&self, base: &str) -> TypeRef {
        match (self.is_list, self.is_non_null) {
            (false, false) => TypeRef::named(base),
            (false, true) => TypeRef::named_nn(base),
            (true, false) => TypeRef::named_list(base),
            (true, true) => TypeRef::named_list_nn(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(base: &str, is_list: bool, is_non_null: bool) -> TypeSignature {
        TypeSignature {
            base_name: base.to_string(),
            is_list,
            is_non_null,
        }
    }

    #[test]
    fn test_parse_signatures() {
        let cases = [
            ("String", sig("String", false, false)),
            ("String!", sig("String", false, true)),
            ("[String]", sig("String", true, false)),
            ("[String]!", sig("String", true, true)),
            ("Int", sig("Int", false, false)),
            ("[User]", sig("User", true, false)),
        ];
        for (input, expected) in cases {
            assert_eq!(TypeSignature::parse(input), expected, "parsing {input}");
        }
    }

    #[test]
    fn test_parse_degenerate_inputs() {
        assert_eq!(TypeSignature::parse(""), sig("", false, false));
        assert_eq!(TypeSignature::parse("!"), sig("", false, true));
        assert_eq!(TypeSignature::parse("[]"), sig("[]", false, false));
        assert_eq!(TypeSignature::parse("[String!]"), sig("String!", true, false));
    }

    #[test]
    fn test_scalar_lookup() {
        assert_eq!(TypeSignature::parse("ID!").scalar(), Some(ScalarKind::Id));
        assert_eq!(TypeSignature::parse("[Float]").scalar(), Some(ScalarKind::Float));
        assert_eq!(TypeSignature::parse("Boolean").scalar(), Some(ScalarKind::Boolean));
        assert_eq!(TypeSignature::parse("User").scalar(), None);
        assert_eq!(TypeSignature::parse("").scalar(), None);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(TypeSignature::parse("[User]!").wrap("User").to_string(), "[User]!");
        assert_eq!(TypeSignature::parse("[User]").wrap("User").to_string(), "[User]");
        assert_eq!(TypeSignature::parse("Int!").wrap("Int").to_string(), "Int!");
        assert_eq!(TypeSignature::parse("Thing").wrap("String").to_string(), "String");
    }
}
