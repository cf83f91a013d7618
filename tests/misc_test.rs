//! Miscellaneous integration tests (health check, fallback, unicode, CORS).

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{expense_json, TestClient};
use serde_json::json;
use tower::ServiceExt;

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    let client = TestClient::new();
    let (status, body) = client.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let client = TestClient::new();
    let (status, body) = client.get_json("/nowhere").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No such endpoint" }));
}

/// Test unicode in record text fields.
#[tokio::test]
async fn test_unicode_descriptions() {
    let mut client = TestClient::new();
    client.register("émilie").await;

    let mut record = expense_json("Food", 18.0);
    record["description"] = json!("東京レストラン ☕");
    let id = client.create("expenses", record).await;

    let (status, body) = client.get_json(&format!("/api/expenses/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "東京レストラン ☕");
}

#[tokio::test]
async fn test_cors_preflight_allows_client_origin() {
    let client = TestClient::new();
    let response = client
        .router()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/incomes")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
}
