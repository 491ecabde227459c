//! Common test utilities for integration tests.
//!
//! Every test builds its own app over a fresh `MemoryStore`, so tests can run
//! in parallel without shared state.

// Not every integration test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use persistence::{EntityStore, MemoryStore};
use rate_desk_api::{app::create_app, config::Config};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Configuration built from embedded defaults, memory backend.
pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to load test config")
}

/// Create a test application over an empty in-memory store.
pub fn create_test_app() -> Router {
    create_test_app_with_store(Arc::new(MemoryStore::new()))
}

pub fn create_test_app_with_store(store: Arc<dyn EntityStore>) -> Router {
    create_app(test_config(), store)
}

/// Build a JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request.
pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Send a request and return its status with the parsed body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, parse_response_body(response).await)
}

/// Create a company with a generated name and return its id.
pub async fn create_test_company(app: &Router) -> i64 {
    let name: String = CompanyName().fake();
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/companies",
            json!({ "name": name, "description": "Service provider" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "company create failed: {body}");
    body["id"].as_i64().unwrap()
}

/// Create an active gateway and return its id.
pub async fn create_test_gateway(app: &Router, company_id: i64, name: &str) -> i64 {
    create_gateway_with_status(app, company_id, name, "active").await
}

pub async fn create_gateway_with_status(
    app: &Router,
    company_id: i64,
    name: &str,
    status: &str,
) -> i64 {
    let (code, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/gateways",
            json!({
                "name": name,
                "company_id": company_id,
                "pg_partner": name.to_lowercase(),
                "status": status,
            }),
        ),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "gateway create failed: {body}");
    body["id"].as_i64().unwrap()
}

/// Rate payload with decimals sent as strings.
pub fn rate_body(
    gateway_id: i64,
    card_type: &str,
    card_issuer: &str,
    category: &str,
    commission: &str,
    range: (&str, &str),
) -> Value {
    json!({
        "gateway_id": gateway_id,
        "card_type": card_type,
        "card_issuer": card_issuer,
        "category": category,
        "commission": commission,
        "surcharge": "0",
        "min_amount": range.0,
        "max_amount": range.1,
    })
}

/// POST a rate, returning status and body.
pub async fn post_rate(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, json_request(Method::POST, "/api/v1/rates", body)).await
}

/// POST a rate that must be accepted and return its id.
pub async fn create_test_rate(app: &Router, body: Value) -> i64 {
    let (status, body) = post_rate(app, body).await;
    assert_eq!(status, StatusCode::CREATED, "rate create failed: {body}");
    body["id"].as_i64().unwrap()
}

/// POST /api/v1/rates/resolve.
pub async fn resolve(
    app: &Router,
    gateway_id: i64,
    card_type: &str,
    card_issuer: &str,
    category: &str,
    amount: &str,
) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            "/api/v1/rates/resolve",
            json!({
                "gateway_id": gateway_id,
                "card_type": card_type,
                "card_issuer": card_issuer,
                "category": category,
                "amount": amount,
            }),
        ),
    )
    .await
}
