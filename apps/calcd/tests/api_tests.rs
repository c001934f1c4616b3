//! Integration tests for the calcd HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use calcd::api::{
    API_KEY_ENV, AppState, CalculateRequest, CalculateResponse, ErrorResponse,
    ExpressionListResponse, ExpressionResponse, HealthResponse, RATE_LIMIT_ENV, create_router,
};
use calcd_core::{Coordinator, ExpressionStatus};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Mutex;

/// Mutex to serialize tests since they modify env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Guard wrapper that holds the mutex and ensures cleanup on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
            std::env::remove_var(RATE_LIMIT_ENV);
        }
    }
}

/// Take the env lock and set up the environment. `None` leaves a variable unset.
fn lock_env(api_key: Option<&str>, rate_limit: Option<&str>) -> TestGuard {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe {
        match api_key {
            Some(key) => std::env::set_var(API_KEY_ENV, key),
            None => std::env::remove_var(API_KEY_ENV),
        }
        match rate_limit {
            Some(rps) => std::env::set_var(RATE_LIMIT_ENV, rps),
            None => std::env::remove_var(RATE_LIMIT_ENV),
        }
    }
    TestGuard { _guard: guard }
}

/// Create a test server with an empty store and default settings.
/// Returns a guard that must be kept alive during the test.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = lock_env(None, None);
    let router = create_router(AppState::new(Coordinator::new()));
    (TestServer::new(router).unwrap(), guard)
}

/// Submit an expression and return its id.
async fn submit(server: &TestServer, expression: &str) -> String {
    let response = server
        .post("/api/v1/calculate")
        .json(&CalculateRequest {
            expression: expression.to_string(),
        })
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CalculateResponse>().id
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// CALCULATE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_calculate_returns_created_with_id() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/api/v1/calculate")
        .json(&json!({"expression": "2+3*4"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: CalculateResponse = response.json();
    assert!(!body.id.is_empty());
}

#[tokio::test]
async fn test_calculate_then_fetch_result() {
    let (server, _guard) = create_test_server();

    let id = submit(&server, "(2+3)*4").await;
    let response = server.get(&format!("/api/v1/expressions/{}", id)).await;

    response.assert_status_ok();
    let body: ExpressionResponse = response.json();
    assert_eq!(body.expression.id.as_str(), id);
    assert_eq!(body.expression.status, ExpressionStatus::Completed);
    assert_eq!(body.expression.result, Some(20.0));
}

#[tokio::test]
async fn test_fetched_record_wire_shape() {
    let (server, _guard) = create_test_server();

    let id = submit(&server, "10/2-1").await;
    let response = server.get(&format!("/api/v1/expressions/{}", id)).await;

    let body: serde_json::Value = response.json();
    assert_eq!(
        body,
        json!({"expression": {"id": id, "status": "completed", "result": 4.0}})
    );
}

#[tokio::test]
async fn test_calculate_invalid_characters() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/api/v1/calculate")
        .json(&json!({"expression": "2+x"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "invalid_expression");

    let list: ExpressionListResponse = server.get("/api/v1/expressions").await.json();
    assert!(list.expressions.is_empty());
}

#[tokio::test]
async fn test_calculate_division_by_zero() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/api/v1/calculate")
        .json(&json!({"expression": "5/0"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "division_by_zero");

    let list: ExpressionListResponse = server.get("/api/v1/expressions").await.json();
    assert!(list.expressions.is_empty());
}

#[tokio::test]
async fn test_calculate_malformed_structure() {
    let (server, _guard) = create_test_server();

    for expression in ["(1+2", "1+", "", "1 2", "()"] {
        let response = server
            .post("/api/v1/calculate")
            .json(&json!({ "expression": expression }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "evaluation_failed", "for {:?}", expression);
    }
}

#[tokio::test]
async fn test_calculate_unparseable_body() {
    let (server, _guard) = create_test_server();

    let response = server.post("/api/v1/calculate").text("not json").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "invalid_body");
}

#[tokio::test]
async fn test_calculate_wrong_shape_body() {
    let (server, _guard) = create_test_server();

    for body in [json!({}), json!({"expression": 5}), json!(["2+2"])] {
        let response = server.post("/api/v1/calculate").json(&body).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_calculate_ignores_content_type() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/api/v1/calculate")
        .text(r#"{"expression": "1 + 1"}"#)
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_calculate_oversized_body() {
    let (server, _guard) = create_test_server();

    let padding = "1".repeat(2 * 1024 * 1024);
    let response = server
        .post("/api/v1/calculate")
        .text(format!(r#"{{"expression": "{}"}}"#, padding))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "invalid_body");

    let list: ExpressionListResponse = server.get("/api/v1/expressions").await.json();
    assert!(list.expressions.is_empty());
}

#[tokio::test]
async fn test_calculate_ignores_unknown_fields() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/api/v1/calculate")
        .json(&json!({"expression": "3*3", "priority": "high"}))
        .await;

    response.assert_status(StatusCode::CREATED);
}

// =============================================================================
// EXPRESSION QUERY TESTS
// =============================================================================

#[tokio::test]
async fn test_list_empty_store() {
    let (server, _guard) = create_test_server();

    let response = server.get("/api/v1/expressions").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({"expressions": []}));
}

#[tokio::test]
async fn test_list_returns_every_submission() {
    let (server, _guard) = create_test_server();

    let mut ids = HashSet::new();
    for i in 0..5 {
        ids.insert(submit(&server, &format!("{} * 2", i)).await);
    }
    assert_eq!(ids.len(), 5);

    let list: ExpressionListResponse = server.get("/api/v1/expressions").await.json();
    let listed: HashSet<String> = list
        .expressions
        .iter()
        .map(|r| r.id.as_str().to_string())
        .collect();
    assert_eq!(listed, ids);
    assert!(
        list.expressions
            .iter()
            .all(|r| r.status == ExpressionStatus::Completed)
    );
}

#[tokio::test]
async fn test_get_unknown_id_is_404() {
    let (server, _guard) = create_test_server();

    let response = server.get("/api/v1/expressions/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "not_found");
}

#[tokio::test]
async fn test_repeated_get_is_identical() {
    let (server, _guard) = create_test_server();

    let id = submit(&server, "7 - 2 - 1").await;
    let path = format!("/api/v1/expressions/{}", id);

    let first: serde_json::Value = server.get(&path).await.json();
    let second: serde_json::Value = server.get(&path).await.json();
    assert_eq!(first, second);
    assert_eq!(first["expression"]["result"], json!(4.0));
}

// =============================================================================
// CONCURRENCY TESTS
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_all_stored() {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const REQUESTS: usize = 64;

    let _guard = lock_env(None, None);
    let router = create_router(AppState::new(Coordinator::new()));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..REQUESTS {
        let router = router.clone();
        tasks.spawn(async move {
            let request = Request::builder()
                .method("POST")
                .uri("/api/v1/calculate")
                .body(Body::from(format!(r#"{{"expression": "{} + 1"}}"#, i)))
                .unwrap();
            let response = router.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            serde_json::from_slice::<CalculateResponse>(&bytes).unwrap().id
        });
    }

    let mut ids = HashSet::new();
    while let Some(id) = tasks.join_next().await {
        ids.insert(id.unwrap());
    }
    assert_eq!(ids.len(), REQUESTS);

    let request = Request::builder()
        .uri("/api/v1/expressions")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let list: ExpressionListResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(list.expressions.len(), REQUESTS);
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_burst_without_rate_limit_env_is_not_throttled() {
    const REQUESTS: usize = 150;

    let (server, _guard) = create_test_server();

    for i in 0..REQUESTS {
        server
            .post("/api/v1/calculate")
            .json(&json!({ "expression": format!("{} - 1", i) }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let list: ExpressionListResponse = server.get("/api/v1/expressions").await.json();
    assert_eq!(list.expressions.len(), REQUESTS);
}

#[tokio::test]
async fn test_rate_limit_exceeded_returns_429() {
    let _guard = lock_env(None, Some("1"));
    let server = TestServer::new(create_router(AppState::default())).unwrap();

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "rate_limited");
}

// =============================================================================
// AUTHENTICATION MIDDLEWARE TESTS
// =============================================================================

/// Create a test server with authentication enabled.
fn create_auth_test_server(api_key: &str) -> (TestServer, TestGuard) {
    let guard = lock_env(Some(api_key), None);
    let router = create_router(AppState::default());
    (TestServer::new(router).unwrap(), guard)
}

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let (server, _guard) = create_auth_test_server(api_key);

    let response = server
        .get("/api/v1/expressions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_valid_raw_token() {
    let api_key = "test-raw-key-67890";
    let (server, _guard) = create_auth_test_server(api_key);

    let response = server
        .post("/api/v1/calculate")
        .add_header(
            axum::http::header::AUTHORIZATION,
            api_key.parse::<HeaderValue>().unwrap(),
        )
        .json(&json!({"expression": "1+1"}))
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let (server, _guard) = create_auth_test_server("correct-key");

    let response = server
        .get("/api/v1/expressions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "unauthorized");
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let (server, _guard) = create_auth_test_server("some-key");

    let response = server
        .post("/api/v1/calculate")
        .json(&json!({"expression": "1+1"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let (server, _guard) = create_auth_test_server("some-key");

    let response = server.get("/health").await;

    response.assert_status_ok();
}
