//! Integration tests for settings, favorites, quote comparison and health.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    create_gateway_with_status, create_test_app, create_test_company, create_test_gateway,
    create_test_rate, delete_request, get_request, json_request, post_rate, rate_body, send,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Two active gateways quoting CC/travel, plus an inactive one undercutting both.
async fn app_with_travel_rates() -> (Router, i64, i64) {
    let app = create_test_app();
    let company_id = create_test_company(&app).await;

    let payu = create_test_gateway(&app, company_id, "Payu").await;
    let razorpay = create_test_gateway(&app, company_id, "Razorpay").await;
    let dormant = create_gateway_with_status(&app, company_id, "Dormant", "inactive").await;

    create_test_rate(
        &app,
        rate_body(payu, "CC", "others", "travel", "1.45", ("100", "100000")),
    )
    .await;
    create_test_rate(
        &app,
        rate_body(razorpay, "CC", "others", "travel", "1.2", ("100", "100000")),
    )
    .await;
    create_test_rate(
        &app,
        rate_body(dormant, "CC", "others", "travel", "0.5", ("100", "100000")),
    )
    .await;

    (app, payu, razorpay)
}

fn quoted_gateways(comparison: &Value) -> Vec<i64> {
    comparison["quotes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["gateway_id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_default_settings() {
    let app = create_test_app();

    let (status, body) = send(&app, get_request("/api/v1/settings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 7);
    assert!(body["cardIssuers"]
        .as_array()
        .unwrap()
        .contains(&json!("others")));
}

#[tokio::test]
async fn test_replaced_settings_govern_rate_writes() {
    let app = create_test_app();
    let company_id = create_test_company(&app).await;
    let gateway_id = create_test_gateway(&app, company_id, "Payu").await;

    let settings = json!({
        "categories": ["travel"],
        "cardTypes": ["CC"],
        "cardIssuers": ["HDFC", "others"],
    });
    let (status, body) = send(&app, json_request(Method::PUT, "/api/v1/settings", settings.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, settings);

    let (status, body) = post_rate(
        &app,
        rate_body(gateway_id, "CC", "others", "education", "1.6", ("100", "50000")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_domain_value");

    create_test_rate(
        &app,
        rate_body(gateway_id, "CC", "HDFC", "travel", "1.6", ("100", "50000")),
    )
    .await;
}

#[tokio::test]
async fn test_settings_must_keep_fallback_issuer() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/settings",
            json!({
                "categories": ["travel"],
                "cardTypes": ["CC"],
                "cardIssuers": ["HDFC"],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, current) = send(&app, get_request("/api/v1/settings")).await;
    assert_eq!(current["categories"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_settings_reject_reserved_category() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/settings",
            json!({
                "categories": ["travel", "All Categories"],
                "cardTypes": ["CC"],
                "cardIssuers": ["others"],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_settings_replacements_match_stored_settings() {
    let app = create_test_app();
    let company_id = create_test_company(&app).await;
    let gateway_id = create_test_gateway(&app, company_id, "Payu").await;

    let settings_for = |category: &str| {
        json!({
            "categories": [category],
            "cardTypes": ["CC"],
            "cardIssuers": ["others"],
        })
    };

    let ((first, _), (second, _)) = tokio::join!(
        send(&app, json_request(Method::PUT, "/api/v1/settings", settings_for("travel"))),
        send(&app, json_request(Method::PUT, "/api/v1/settings", settings_for("education"))),
    );
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let (_, stored) = send(&app, get_request("/api/v1/settings")).await;
    let kept = stored["categories"][0].as_str().unwrap().to_string();
    let dropped = if kept == "travel" { "education" } else { "travel" };

    // Writes follow whichever replacement the store kept.
    create_test_rate(
        &app,
        rate_body(gateway_id, "CC", "others", &kept, "1.2", ("100", "50000")),
    )
    .await;
    let (status, body) = post_rate(
        &app,
        rate_body(gateway_id, "CC", "others", dropped, "1.2", ("100", "50000")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_domain_value");
}

// ============================================================================
// Quotes
// ============================================================================

#[tokio::test]
async fn test_quotes_ranked_by_total_fee() {
    let (app, payu, razorpay) = app_with_travel_rates().await;

    let (status, comparison) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/quotes",
            json!({
                "card_type": "CC",
                "card_issuer": "HDFC",
                "category": "travel",
                "amount": "1000",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The inactive gateway is never quoted.
    assert_eq!(quoted_gateways(&comparison), vec![razorpay, payu]);
    assert_eq!(comparison["quotes"][0]["fee"]["total_fee"], "12.00");
    assert_eq!(comparison["quotes"][0]["issuer_match"], "fallback");
    assert_eq!(comparison["quotes"][1]["fee"]["total_fee"], "14.50");
    assert_eq!(comparison["integrity_faults"], json!([]));
}

#[tokio::test]
async fn test_quotes_skip_gateways_without_a_rate() {
    let (app, _, _) = app_with_travel_rates().await;

    let (status, comparison) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/quotes",
            json!({
                "card_type": "CC",
                "card_issuer": "HDFC",
                "category": "education",
                "amount": "1000",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(comparison["quotes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quote_requires_card_type() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/quotes",
            json!({ "card_type": " ", "card_issuer": "HDFC", "amount": "10" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_favorite_lifecycle_and_quote() {
    let (app, payu, razorpay) = app_with_travel_rates().await;

    let (status, first) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/favorites",
            json!({
                "name": "Travel card",
                "card_type": "CC",
                "card_issuer": "HDFC",
                "amount": "1000",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["category"], "All Categories");

    let (status, second) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/favorites",
            json!({
                "name": "Education",
                "card_type": "CC",
                "card_issuer": "SBI",
                "amount": "500",
                "category": "education",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = send(&app, get_request("/api/v1/favorites")).await;
    assert_eq!(list["count"], 2);
    assert_eq!(list["data"][0]["id"], second["id"]);
    assert_eq!(list["data"][1]["id"], first["id"]);

    // "All Categories" quotes every configured category.
    let first_id = first["id"].as_i64().unwrap();
    let (status, comparison) =
        send(&app, get_request(&format!("/api/v1/favorites/{first_id}/quote"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quoted_gateways(&comparison), vec![razorpay, payu]);
    assert_eq!(comparison["descriptor"]["amount"], "1000");

    let (status, _) = send(&app, delete_request(&format!("/api/v1/favorites/{first_id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get_request(&format!("/api/v1/favorites/{first_id}/quote"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, delete_request(&format!("/api/v1/favorites/{first_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_requires_name() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/favorites",
            json!({ "name": "", "card_type": "CC", "card_issuer": "HDFC", "amount": "10" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_test_app();

    let (status, body) = send(&app, get_request("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["backend"], "memory");

    let (status, body) = send(&app, get_request("/api/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let (status, body) = send(&app, get_request("/api/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = create_test_app();

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/health/live")
                .header("X-Request-ID", "trace-me")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me");
}
