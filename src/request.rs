//! Transport-neutral view of an incoming request.

use axum::body::Bytes;

/// The parts of an HTTP request the dispatcher looks at.
#[derive(Debug, Clone, Default)]
pub struct MockRequest {
    /// HTTP method as received
    pub method: String,
    /// URL path, without the query string
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub body: Bytes,
}

impl MockRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: None,
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First decoded value of the query parameter `name`.
    pub fn query_first(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Whether the method carries a body that templates may reference.
    pub fn has_body_semantics(&self) -> bool {
        matches!(self.method.as_str(), "POST" | "PUT" | "PATCH")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_first_value_wins() {
        let req = MockRequest::new("GET", "/search").with_query("q=rust&q=go&page=2");
        assert_eq!(req.query_first("q").as_deref(), Some("rust"));
        assert_eq!(req.query_first("page").as_deref(), Some("2"));
        assert_eq!(req.query_first("missing"), None);
    }

    #[test]
    fn test_query_decoding() {
        let req = MockRequest::new("GET", "/").with_query("name=John%20Doe&city=New+York");
        assert_eq!(req.query_first("name").as_deref(), Some("John Doe"));
        assert_eq!(req.query_first("city").as_deref(), Some("New York"));
    }

    #[test]
    fn test_no_query() {
        let req = MockRequest::new("GET", "/");
        assert_eq!(req.query_first("x"), None);
    }

    #[test]
    fn test_body_semantics() {
        assert!(MockRequest::new("POST", "/").has_body_semantics());
        assert!(MockRequest::new("PATCH", "/").has_body_semantics());
        assert!(!MockRequest::new("GET", "/").has_body_semantics());
        assert!(!MockRequest::new("DELETE", "/").has_body_semantics());
    }
}
