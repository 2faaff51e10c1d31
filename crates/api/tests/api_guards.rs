//! Router-level checks for requests that are rejected before any database
//! work: authentication, input validation and path parsing. Also covers the
//! in-memory notification endpoints, which never touch the database.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::*;
use serde_json::json;
use uuid::Uuid;
use wishdrop_core::badges::BadgeNotification;

fn app() -> axum::Router {
    build_test_app(test_state(unreachable_pool()))
}

fn valid_wish_body() -> serde_json::Value {
    json!({
        "title": "Winter coat",
        "description": "A warm coat for the season",
        "amount": 8_000,
        "category": "family"
    })
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn protected_endpoints_require_a_token() {
    let wish_id = Uuid::new_v4();
    let donations_uri = format!("/api/v1/wishes/{wish_id}/donations");
    let reports_uri = format!("/api/v1/wishes/{wish_id}/reports");
    let cases: [(&str, Option<serde_json::Value>); 7] = [
        ("/api/v1/me", None),
        ("/api/v1/me/donations", None),
        ("/api/v1/me/notifications", None),
        ("/api/v1/wishes", Some(valid_wish_body())),
        (&donations_uri, Some(json!({ "amount": 500 }))),
        (&reports_uri, Some(json!({ "reason": "spam" }))),
        ("/api/v1/reports", None),
    ];

    for (uri, body) in cases {
        let response = match body {
            Some(body) => post_json(app(), uri, body).await,
            None => get(app(), uri).await,
        };
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "UNAUTHORIZED", "{uri}");
    }
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let response = get_auth(app(), "/api/v1/me/notifications", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let mut config = test_jwt_config();
    config.secret = "a-completely-different-secret-value".to_string();
    let token =
        wishdrop_api::auth::jwt::generate_access_token(Uuid::new_v4(), None, &config).unwrap();

    let response = get_auth(app(), "/api/v1/me/notifications", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_token_on_public_listing_is_rejected_rather_than_ignored() {
    let response = get_auth(app(), "/api/v1/wishes", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Listing parameters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_rejects_unknown_sort() {
    let response = get(app(), "/api/v1/wishes?sort=popularity").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn listing_rejects_inverted_amount_range() {
    let response = get(app(), "/api/v1/wishes?min_amount=5000&max_amount=100").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_rejects_unknown_category() {
    let response = get(app(), "/api/v1/wishes?category=spaceships").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_rejects_non_numeric_limit() {
    let response = get(app(), "/api/v1/wishes?limit=lots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn leaderboard_rejects_out_of_range_size() {
    for uri in ["/api/v1/leaderboard?limit=0", "/api/v1/leaderboard?limit=101"] {
        let response = get(app(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_wish_validates_body() {
    let token = token_for(Uuid::new_v4());

    let mut empty_title = valid_wish_body();
    empty_title["title"] = json!("");
    let response = post_json_auth(app(), "/api/v1/wishes", &token, empty_title).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("title"));

    let mut zero_amount = valid_wish_body();
    zero_amount["amount"] = json!(0);
    let response = post_json_auth(app(), "/api/v1/wishes", &token, zero_amount).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut bad_category = valid_wish_body();
    bad_category["category"] = json!("yachts");
    let response = post_json_auth(app(), "/api/v1/wishes", &token, bad_category).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_wish_rejects_past_expiry() {
    let token = token_for(Uuid::new_v4());
    let mut body = valid_wish_body();
    body["expires_at"] = json!(Utc::now() - chrono::Duration::days(1));

    let response = post_json_auth(app(), "/api/v1/wishes", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn donation_amount_is_validated_before_lookup() {
    let token = token_for(Uuid::new_v4());
    let uri = format!("/api/v1/wishes/{}/donations", Uuid::new_v4());

    for amount in [json!(0), json!(-500), json!("abc"), json!("0.00")] {
        let response = post_json_auth(app(), &uri, &token, json!({ "amount": amount })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "amount {amount}");
    }
}

#[tokio::test]
async fn overlong_donation_message_is_rejected() {
    let token = token_for(Uuid::new_v4());
    let uri = format!("/api/v1/wishes/{}/donations", Uuid::new_v4());
    let body = json!({ "amount": 500, "message": "x".repeat(501) });

    let response = post_json_auth(app(), &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_report_reason_is_rejected() {
    let token = token_for(Uuid::new_v4());
    let uri = format!("/api/v1/wishes/{}/reports", Uuid::new_v4());

    let response = post_json_auth(app(), &uri, &token, json!({ "reason": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_uuid_path_is_rejected() {
    let response = get(app(), "/api/v1/wishes/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Notifications (in-memory)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notifications_start_empty() {
    let token = token_for(Uuid::new_v4());
    let response = get_auth(app(), "/api/v1/me/notifications", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn dismissing_unknown_notification_is_not_found() {
    let token = token_for(Uuid::new_v4());
    let uri = format!("/api/v1/me/notifications/{}", Uuid::new_v4());

    let response = delete_auth(app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pending_notifications_are_listed_then_dismissed() {
    let user_id = Uuid::new_v4();
    let badge_id = Uuid::new_v4();
    let state = test_state(unreachable_pool());
    state
        .inbox
        .push(BadgeNotification {
            user_id,
            badge_id,
            name: "First Gift".to_string(),
            description: None,
            icon: "heart",
            earned_at: Some(Utc::now()),
            reason: None,
        })
        .await;
    let token = token_for(user_id);

    let response = get_auth(build_test_app(state.clone()), "/api/v1/me/notifications", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["name"], "First Gift");

    let uri = format!("/api/v1/me/notifications/{badge_id}");
    let response = delete_auth(build_test_app(state.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(state), "/api/v1/me/notifications", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn clearing_notifications_returns_no_content() {
    let token = token_for(Uuid::new_v4());
    let response = delete_auth(app(), "/api/v1/me/notifications", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
