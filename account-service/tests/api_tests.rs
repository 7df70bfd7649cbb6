mod common;

use account_service::domain::user::models::UserId;
use auth::Claims;
use chrono::Utc;
use common::TestApp;
use common::ADMIN_EMAIL;
use common::ADMIN_PASSWORD;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({ "username": "nicola", "email": "nicola@example.com" })
    );
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;
    let response = app.register("other", "nicola@example.com", "Pass_w0rd!").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "user already exists" }));
}

#[tokio::test]
async fn test_register_duplicate_is_reported_before_validation() {
    let app = TestApp::spawn().await;

    app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;
    let response = app.register("x", "nicola@example.com", "weak").await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "user already exists");
}

#[tokio::test]
async fn test_register_validation_failures() {
    let app = TestApp::spawn().await;

    let cases = [
        ("nicola", "not-an-email", "Pass_w0rd!"),
        ("nicola", "nicola@example.com", "short"),
        ("nicola", "nicola@example.com", "alllowercase1!"),
        ("ni", "nicola@example.com", "Pass_w0rd!"),
        ("nicola_b", "nicola@example.com", "Pass_w0rd!"),
    ];

    for (username, email, password) in cases {
        let response = app.register(username, email, password).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{} / {} / {}",
            username,
            email,
            password
        );
        let body: serde_json::Value = response.json().await.unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(
            message.starts_with("failed to validate create user parameters"),
            "unexpected message: {}",
            message
        );
    }
}

#[tokio::test]
async fn test_login_sets_secure_cookie() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;

    let response = app.login("nicola@example.com", "Pass_w0rd!").await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .cookies()
        .find(|cookie| cookie.name() == "token")
        .expect("token cookie should be set");
    assert!(cookie.http_only());
    assert!(cookie.secure());
    assert!(cookie.same_site_lax());
    assert_eq!(cookie.path(), Some("/"));
    assert!(cookie.max_age().is_none());
    assert!(cookie.expires().is_none());

    let claims = app.jwt_handler.verify(cookie.value()).unwrap();
    assert_eq!(claims.role, "USER");
    assert_eq!(claims.expires_at - claims.issued_at, 86_400);

    assert_eq!(response.text().await.unwrap(), "success");
}

#[tokio::test]
async fn test_login_wrong_password_sets_no_cookie() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;

    let response = app.login("nicola@example.com", "Wrong_passw0rd").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(reqwest::header::SET_COOKIE).is_none());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "invalid email or password" }));
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;

    let unknown = app.login("nobody@example.com", "Pass_w0rd!").await;
    let wrong = app.login("nicola@example.com", "Wrong_passw0rd").await;

    assert_eq!(unknown.status(), wrong.status());
    assert_eq!(unknown.text().await.unwrap(), wrong.text().await.unwrap());
}

#[tokio::test]
async fn test_restricted_with_login_cookie() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;
    let token = app.login_token("nicola@example.com", "Pass_w0rd!").await;
    let subject = app.jwt_handler.verify(&token).unwrap().subject;

    let response = app.get_with_token("/restricted", &token).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        format!("Welcome {} with role: USER!", subject)
    );
}

#[tokio::test]
async fn test_restricted_without_cookie() {
    let app = TestApp::spawn().await;

    let response = app.get("/restricted").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restricted_with_invalid_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_with_token("/restricted", "eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "invalid or expired token" }));
}

#[tokio::test]
async fn test_restricted_with_expired_token() {
    let app = TestApp::spawn().await;
    let now = Utc::now().timestamp();
    let expired = Claims::new()
        .with_subject(UserId::new().to_string())
        .with_role("USER".to_string())
        .with_issuer("account-service".to_string())
        .with_issued_at(now - 120)
        .with_not_before(now - 120)
        .with_expiration(now - 60);
    let token = app.jwt_handler.encode(&expired).unwrap();

    let response = app.get_with_token("/restricted", &token).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_route_forbids_regular_user() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "Pass_w0rd!").await;
    let token = app.login_token("nicola@example.com", "Pass_w0rd!").await;

    let response = app
        .get_with_token("/api/admin/users", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_route_admits_bootstrapped_admin() {
    let app = TestApp::spawn().await;
    let token = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app
        .get_with_token("/api/admin/users", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .text()
        .await
        .unwrap()
        .ends_with("with role: ADMIN!"));
}
