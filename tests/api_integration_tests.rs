use axum::{
    body::Body,
    http::{header::ALLOW, HeaderMap, Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service;
use uuid::Uuid;

use error_advice::api::{create_router, handlers::AppStateInner};
use error_advice::models::OrderStore;

// Helper to create test app
fn create_test_app() -> axum::Router {
    let state = Arc::new(AppStateInner {
        orders: OrderStore::new(),
        instance_id: "test-instance".to_string(),
    });
    create_router(state)
}

async fn send(
    app: &mut axum::Router,
    request: Request<Body>,
) -> (StatusCode, HeaderMap, Value) {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));

    (status, headers, json)
}

// Helper to send request and parse JSON response
async fn send_json_request(
    app: &mut axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// Helper to send JSON request with JSON body
async fn send_json_body_request(
    app: &mut axum::Router,
    method: &str,
    uri: &str,
    body: &str,
) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn create_order(app: &mut axum::Router) -> Value {
    let (status, _, body) = send_json_body_request(
        app,
        "POST",
        "/orders",
        r#"{"sku":"SKU-1","quantity":2,"email":"buyer@example.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

/// Checks the fields every error payload carries and returns its log id
fn assert_error_payload(headers: &HeaderMap, body: &Value, code: &str) -> Uuid {
    assert_eq!(body["code"], code);
    assert!(body["message"].is_string());
    assert!(body["time"].is_string());
    assert!(body["errors"].is_array());

    let log_id = Uuid::parse_str(body["logId"].as_str().unwrap()).unwrap();
    assert_eq!(headers["x-log-id"].to_str().unwrap(), log_id.to_string());
    log_id
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut app = create_test_app();
    let (status, _, body) = send_json_request(&mut app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["instance_id"], "test-instance");
}

#[tokio::test]
async fn test_missing_query_parameter() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "GET", "/orders").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_payload(&headers, &body, "BAD_REQUEST");
    assert_eq!(body["message"], "invalid input");
    assert_eq!(
        body["errors"],
        json!([{"field": "status", "value": "", "reason": "parameter not present"}])
    );
}

#[tokio::test]
async fn test_query_binding_failure() {
    let mut app = create_test_app();
    let (status, headers, body) =
        send_json_request(&mut app, "GET", "/orders?status=pending&size=500").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_payload(&headers, &body, "BAD_REQUEST");
    assert_eq!(
        body["errors"],
        json!([{"field": "size", "value": "500", "reason": "must be at most 100"}])
    );
}

#[tokio::test]
async fn test_constraint_violation_uses_last_path_segment() {
    let mut app = create_test_app();
    let (status, headers, body) =
        send_json_request(&mut app, "GET", "/orders?status=pending&page=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_payload(&headers, &body, "BAD_REQUEST");
    assert_eq!(body["errors"][0]["field"], "page");
    assert_eq!(body["errors"][0]["value"], "");
}

#[tokio::test]
async fn test_query_type_mismatch() {
    let mut app = create_test_app();
    let cases = [
        ("/orders?status=bogus", "status", "bogus"),
        ("/orders?status=pending&page=abc", "page", "abc"),
        ("/orders?status=pending&size=-1", "size", "-1"),
    ];

    for (uri, field, value) in cases {
        let (status, headers, body) = send_json_request(&mut app, "GET", uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_error_payload(&headers, &body, "BAD_REQUEST");
        assert_eq!(
            body["errors"],
            json!([{"field": field, "value": value, "reason": "typeMismatch"}]),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_path_type_mismatch() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "GET", "/orders/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_payload(&headers, &body, "BAD_REQUEST");
    assert_eq!(
        body["errors"],
        json!([{"field": "id", "value": "abc", "reason": "typeMismatch"}])
    );
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "GET", "/orders/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_payload(&headers, &body, "NOT_FOUND");
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn test_body_validation_failure_keeps_order() {
    let mut app = create_test_app();
    let (status, headers, body) =
        send_json_body_request(&mut app, "POST", "/orders", r#"{"sku":"","quantity":0}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_payload(&headers, &body, "BAD_REQUEST");
    assert_eq!(
        body["errors"],
        json!([
            {"field": "sku", "value": "", "reason": "must not be blank"},
            {"field": "quantity", "value": "0", "reason": "must be between 1 and 100"},
            {"field": "email", "value": "", "reason": "must be a well-formed email address"}
        ])
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let mut app = create_test_app();
    let (status, headers, body) =
        send_json_body_request(&mut app, "POST", "/orders", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_payload(&headers, &body, "BAD_REQUEST");
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn test_order_lifecycle_and_payment_errors() {
    let mut app = create_test_app();
    let order = create_order(&mut app).await;
    assert_eq!(order["id"], 1);
    assert_eq!(order["status"], "pending");

    let (status, _, body) = send_json_request(&mut app, "GET", "/orders/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sku"], "SKU-1");

    let (status, _, body) = send_json_request(&mut app, "POST", "/orders/1/payment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paid");

    let (status, headers, body) =
        send_json_request(&mut app, "POST", "/orders/1/payment").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_payload(&headers, &body, "BAD_REQUEST");
    assert_eq!(
        body["errors"],
        json!([{"field": "orderId", "value": "ORDER-1", "reason": ""}])
    );

    let (status, _, body) = send_json_request(&mut app, "GET", "/orders?status=paid").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_payment_error_takes_status_from_its_code() {
    let mut app = create_test_app();
    create_order(&mut app).await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/orders/1")
        .header("x-role", "admin")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&mut app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, headers, body) =
        send_json_request(&mut app, "POST", "/orders/1/payment").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_payload(&headers, &body, "FORBIDDEN");
    assert_eq!(
        body["errors"],
        json!([{"field": "orderId", "value": "ORDER-1", "reason": ""}])
    );
}

#[tokio::test]
async fn test_access_denied() {
    let mut app = create_test_app();
    create_order(&mut app).await;

    let (status, headers, body) = send_json_request(&mut app, "DELETE", "/orders/1").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_payload(&headers, &body, "FORBIDDEN");
    assert_eq!(body["message"], "access denied");
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn test_authentication_failure() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "GET", "/me").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_payload(&headers, &body, "UNAUTHORIZED");
    assert_eq!(body["errors"], json!([]));

    let request = Request::builder()
        .uri("/me")
        .header("authorization", "Bearer alice")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&mut app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "alice");
}

#[tokio::test]
async fn test_method_not_allowed() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "PUT", "/health").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_error_payload(&headers, &body, "METHOD_NOT_ALLOWED");
    assert!(headers.contains_key(ALLOW));
}

#[tokio::test]
async fn test_unknown_route() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "GET", "/nowhere").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_payload(&headers, &body, "NOT_FOUND");
}

#[tokio::test]
async fn test_unhandled_error_hides_detail() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "GET", "/debug/fail").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_payload(&headers, &body, "UNKNOWN");
    assert_eq!(body["message"], "unclassified server error");
    assert!(!body.to_string().contains("ledger"));
}

#[tokio::test]
async fn test_panic_is_translated() {
    let mut app = create_test_app();
    let (status, headers, body) = send_json_request(&mut app, "GET", "/debug/panic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_payload(&headers, &body, "UNKNOWN");
    assert!(!body.to_string().contains("invariant"));
}

#[tokio::test]
async fn test_log_ids_differ_between_requests() {
    let mut app = create_test_app();
    let (_, headers, first) = send_json_request(&mut app, "GET", "/me").await;
    let first = assert_error_payload(&headers, &first, "UNAUTHORIZED");
    let (_, headers, second) = send_json_request(&mut app, "GET", "/me").await;
    let second = assert_error_payload(&headers, &second, "UNAUTHORIZED");

    assert_ne!(first, second);
}

#[tokio::test]
async fn test_metrics_endpoint_counts_errors() {
    let mut app = create_test_app();
    send_json_request(&mut app, "GET", "/me").await;

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("errors_handled_total"));
}

#[tokio::test]
async fn test_openapi_document() {
    let mut app = create_test_app();
    let (status, _, body) = send_json_request(&mut app, "GET", "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["components"]["schemas"]["ErrorResponse"].is_object());

    let params = body["paths"]["/orders"]["get"]["parameters"].as_array().unwrap();
    assert!(params.iter().all(|p| p["in"] == "query"));
}
