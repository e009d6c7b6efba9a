//! Router-level tests for paths that resolve before any database round trip:
//! the root banner, health, resource resolution, id parsing, and request
//! validation. The pool is lazily connected and never touched.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use inventory_api::{app_router, catalog, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/inventory_test")
        .expect("lazy pool");
    app_router(AppState {
        pool,
        catalog: Arc::new(catalog()),
    })
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = match body {
        Some(v) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn root_reports_running() {
    let (status, body) = send(test_app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Inventory API is running");
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(test_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let (status, body) = send(test_app(), Method::GET, "/gadgets", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = send(test_app(), Method::DELETE, "/gadgets/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_rejected() {
    let (status, body) = send(test_app(), Method::GET, "/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn create_with_missing_fields_lists_them() {
    let (status, body) = send(
        test_app(),
        Method::POST,
        "/products",
        Some(json!({"name": "Widget", "price": 9.99})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"sku"));
    assert!(fields.contains(&"category"));
    assert!(fields.contains(&"stock"));
    assert!(fields.contains(&"min_stock"));
    assert!(!fields.contains(&"name"));
}

#[tokio::test]
async fn create_accepts_trailing_slash() {
    // Still a validation failure (no DB), but it must route to the handler,
    // not fall through to a 404.
    let (status, body) = send(test_app(), Method::POST, "/customers/", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn create_with_bad_email_is_rejected() {
    let (status, body) = send(
        test_app(),
        Method::POST,
        "/customers",
        Some(json!({"name": "Jane", "email": "nope", "phone": "555"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["field"], "email");
}

#[tokio::test]
async fn patch_with_mistyped_field_is_rejected() {
    let (status, body) = send(
        test_app(),
        Method::PATCH,
        "/customers/1",
        Some(json!({"total_orders": "three"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let (status, body) = send(test_app(), Method::POST, "/warehouses", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}
