use axum::http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use fanpage_approval::domain::types::Profile;
use fanpage_approval::infra::mail::HttpMailer;
use fanpage_approval::router::build_router;
use fanpage_approval::state::AppState;
use fanpage_auth_types::identity::SessionSecret;
use fanpage_testing::auth::{MockSession, TEST_SESSION_SECRET};

use crate::helpers::{
    TEST_SITE_NAME, TEST_TTL_MINUTES, seed_profile, sqlite_db, test_admin, test_banned,
    test_profile,
};

fn state(db: DatabaseConnection) -> AppState {
    AppState {
        db,
        session_secret: SessionSecret::new(TEST_SESSION_SECRET),
        mailer: HttpMailer::new(
            "http://127.0.0.1:9/emails".to_owned(),
            "unused".to_owned(),
            "noreply@fanpage.test".to_owned(),
        )
        .unwrap(),
        code_ttl_minutes: TEST_TTL_MINUTES,
        site_name: TEST_SITE_NAME.to_owned(),
    }
}

/// Router over a disconnected database: anything that reaches the store fails.
fn server() -> TestServer {
    TestServer::new(build_router(state(DatabaseConnection::Disconnected))).unwrap()
}

/// Router over an in-memory database seeded with `profiles`.
async fn seeded_server(profiles: &[Profile]) -> TestServer {
    let db = sqlite_db().await;
    for profile in profiles {
        seed_profile(&db, profile).await;
    }
    TestServer::new(build_router(state(db))).unwrap()
}

fn bearer(user_id: Uuid) -> HeaderValue {
    MockSession::new(user_id).bearer(TEST_SESSION_SECRET)
}

fn caller() -> MockSession {
    MockSession::new(Uuid::from_u128(1))
}

#[tokio::test]
async fn healthz_returns_200() {
    let response = server().get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn readyz_reports_unavailable_database() {
    let response = server().get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_reject_redeem_without_session() {
    let response = server()
        .post("/approval/redeem")
        .json(&json!({ "code": "ABCD2345XY" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_expired_session() {
    let session = MockSession::expired(Uuid::from_u128(1));
    let response = server()
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, session.bearer(TEST_SESSION_SECRET))
        .json(&json!({ "code": "ABCD2345XY" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_session_signed_with_other_secret() {
    let response = server()
        .get("/approval/status")
        .add_header(AUTHORIZATION, caller().bearer("not-the-session-secret"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_malformed_code_before_store() {
    let response = server()
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, caller().bearer(TEST_SESSION_SECRET))
        .json(&json!({ "code": "not a code" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_CODE");
    assert_eq!(body["error"], "invalid code");
}

#[tokio::test]
async fn should_hide_store_failure_details() {
    let response = server()
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, caller().bearer(TEST_SESSION_SECRET))
        .json(&json!({ "code": "abcd2345xy" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["kind"], "STORE_ERROR");
    assert_eq!(body["error"], "internal error");
}

#[tokio::test]
async fn should_attach_request_id() {
    let response = server().get("/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_propagate_caller_request_id() {
    let response = server()
        .get("/healthz")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-123"),
        )
        .await;
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-123"
    );
}

// ── Request shape ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_render_body_rejection_as_error_json() {
    let response = server()
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, caller().bearer(TEST_SESSION_SECRET))
        .json(&json!({ "token": "ABCD2345XY" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
    assert!(body["error"].as_str().unwrap().contains("code"));
}

#[tokio::test]
async fn should_render_missing_content_type_as_error_json() {
    let response = server()
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, caller().bearer(TEST_SESSION_SECRET))
        .text("{\"code\":\"ABCD2345XY\"}")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}

#[tokio::test]
async fn should_render_bad_query_as_error_json() {
    let response = server()
        .get("/approval/codes")
        .add_query_param("subjectId", "not-a-uuid")
        .add_header(AUTHORIZATION, caller().bearer(TEST_SESSION_SECRET))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}

#[tokio::test]
async fn should_render_bad_path_as_error_json() {
    let response = server()
        .put("/profiles/not-a-uuid/ban")
        .add_header(AUTHORIZATION, caller().bearer(TEST_SESSION_SECRET))
        .json(&json!({ "banned": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}

// ── Against a real store ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_refuse_issue_from_non_admin() {
    let fan = test_profile(1);
    let server = seeded_server(&[test_admin(), fan.clone()]).await;

    let response = server
        .post("/approval/issue")
        .add_header(AUTHORIZATION, bearer(fan.id))
        .json(&json!({ "subjectId": fan.id, "ttlMinutes": 60 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "UNAUTHORIZED");

    let codes = server
        .get("/approval/codes")
        .add_query_param("subjectId", fan.id)
        .add_header(AUTHORIZATION, bearer(test_admin().id))
        .await;
    assert_eq!(codes.status_code(), StatusCode::OK);
    assert_eq!(codes.json::<Value>(), json!([]));
}

#[tokio::test]
async fn should_issue_then_redeem_over_http() {
    let fan = test_profile(1);
    let server = seeded_server(&[test_admin(), fan.clone()]).await;

    let issued = server
        .post("/approval/issue")
        .add_header(AUTHORIZATION, bearer(test_admin().id))
        .json(&json!({ "subjectId": fan.id, "ttlMinutes": 60 }))
        .await;
    assert_eq!(issued.status_code(), StatusCode::CREATED);
    let code = issued.json::<Value>()["code"].as_str().unwrap().to_owned();

    let redeemed = server
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, bearer(fan.id))
        .json(&json!({ "code": code.to_lowercase() }))
        .await;
    assert_eq!(redeemed.status_code(), StatusCode::OK);
    assert_eq!(redeemed.json::<Value>(), json!({ "ok": true }));

    let status = server
        .get("/approval/status")
        .add_header(AUTHORIZATION, bearer(fan.id))
        .await;
    let body: Value = status.json();
    assert_eq!(body["state"], "approved");
    assert_eq!(body["approved"], true);

    let reused = server
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, bearer(fan.id))
        .json(&json!({ "code": code }))
        .await;
    assert_eq!(reused.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(reused.json::<Value>()["kind"], "INVALID_CODE");
}

#[tokio::test]
async fn should_refuse_redeem_for_banned_caller() {
    let banned = test_banned(3);
    let server = seeded_server(&[test_admin(), banned.clone()]).await;

    let response = server
        .post("/approval/redeem")
        .add_header(AUTHORIZATION, bearer(banned.id))
        .json(&json!({ "code": "ABCD2345XY" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "BANNED");
}
