//! Health endpoint and general HTTP behaviour. Runs without a database.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, test_state, unreachable_pool};

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = build_test_app(test_state(unreachable_pool()));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(test_state(unreachable_pool()));
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app(test_state(unreachable_pool()));
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must carry x-request-id");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
