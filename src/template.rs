//! Response body templating.
//!
//! Recognized tokens:
//!
//! - `{{path}}`: request path
//! - `{{method}}`: request method
//! - `{{query.NAME}}`: first value of query parameter `NAME`
//! - `{{body}}`: request body as compact JSON (POST, PUT and PATCH only)
//!
//! Tokens without matching request data are left in place.

use crate::request::MockRequest;
use regex::{Captures, Regex};

/// Renders endpoint response templates against a request.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    query_token: Regex,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self {
            query_token: Regex::new(r"\{\{query\.([^{}]+)\}\}")
                .expect("query token pattern is a valid regex"),
        }
    }

    /// Substitute request data into `template`.
    pub fn render(&self, template: &str, request: &MockRequest) -> String {
        let mut rendered = template
            .replace("{{path}}", &request.path)
            .replace("{{method}}", &request.method);

        if rendered.contains("{{query.") {
            rendered = self
                .query_token
                .replace_all(&rendered, |caps: &Captures| {
                    request
                        .query_first(&caps[1])
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned();
        }

        if request.has_body_semantics() && rendered.contains("{{body}}") {
            if let Some(body) = compact_json(&request.body) {
                rendered = rendered.replace("{{body}}", &body);
            }
        }

        rendered
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-serialize `body` as compact JSON, if it is JSON at all.
fn compact_json(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    serde_json::to_string(&value).ok()
}
