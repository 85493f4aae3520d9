//! End-to-end tests through the axum router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bland_mock_api::{server, MockApiConfig, RequestDispatcher};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const CONFIG: &str = r#"
[server]
service_name = "integration"

[[endpoints]]
path = "/api/users"
method = "GET"
response = '{"users": []}'

[[endpoints]]
path = "/api/users"
method = "POST"
status = 201
response = '{"created": {{body}}}'

[[endpoints]]
path = "/api/echo"
response = '{"name": "{{query.name}}", "method": "{{method}}"}'

[[endpoints]]
path = "/api/headers"
response = "plain"
headers = { Content-Type = "text/plain", X-Mock = "yes" }

[graphql]
enabled = true

[[graphql.types]]
name = "User"
fields = { id = "Int!", name = "String!" }

[[graphql.queries]]
name = "users"
return_type = "[User]"
response = '[{"id": 1, "name": "Ada"}]'

[[graphql.mutations]]
name = "createUser"
return_type = "User"
args = { name = "String!" }
response = '{"id": 2, "name": "Grace"}'
"#;

fn app() -> Router {
    let config = MockApiConfig::from_toml_str(CONFIG).unwrap();
    config.validate().unwrap();
    let dispatcher = RequestDispatcher::from_config(&config).unwrap();
    server::router(Arc::new(dispatcher), &config.server)
}

async fn send(request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_check_reports_service_name() {
    let (status, headers, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body, r#"{"status":"healthy","service":"integration"}"#);
}

#[tokio::test]
async fn get_returns_canned_body() {
    let (status, headers, body) = send(get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body, r#"{"users": []}"#);
}

#[tokio::test]
async fn post_echoes_compacted_body() {
    let (status, _, body) = send(post("/api/users", r#"{ "name" : "Ada" }"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, r#"{"created": {"name":"Ada"}}"#);
}

#[tokio::test]
async fn unsupported_method_lists_allowed_methods() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/users")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers[header::ALLOW], "GET, POST");
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["allowed"], json!(["GET", "POST"]));
    assert_eq!(body["received"], "DELETE");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, _, body) = send(get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        r#"{"error":"endpoint not found","path":"/nope","method":"GET"}"#
    );
}

#[tokio::test]
async fn query_parameters_fill_template() {
    let (status, _, body) = send(get("/api/echo?name=Ada%20Lovelace&name=ignored")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"name": "Ada Lovelace", "method": "GET"}"#);
}

#[tokio::test]
async fn configured_headers_override_content_type() {
    let (_, headers, body) = send(get("/api/headers")).await;
    assert_eq!(body, "plain");
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
    assert_eq!(headers["x-mock"], "yes");
}

#[tokio::test]
async fn graphql_query_returns_canned_list() {
    let (status, _, body) = send(post("/graphql", r#"{"query": "{ users { id name } }"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"data": {"users": [{"id": 1, "name": "Ada"}]}}));
}

#[tokio::test]
async fn graphql_mutation_with_variables() {
    let request = r#"{
        "query": "mutation Create($name: String!) { createUser(name: $name) { name } }",
        "operationName": "Create",
        "variables": {"name": "ignored"}
    }"#;
    let (status, _, body) = send(post("/graphql", request)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"data": {"createUser": {"name": "Grace"}}}));
}

#[tokio::test]
async fn graphql_rejects_get() {
    let (status, _, _) = send(get("/graphql")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn demo_config_loads() {
    let config = MockApiConfig::from_toml_str(include_str!("../demos/default-config.toml")).unwrap();
    config.validate().unwrap();
    let dispatcher = RequestDispatcher::from_config(&config).unwrap();
    assert!(dispatcher.endpoints().len() >= 6);
}
