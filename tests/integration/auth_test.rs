//! Integration tests for login, `me`, registration and health.

mod helpers;

use careerly_database::AccountStore;
use careerly_entity::Role;
use helpers::{STRONG_PASSWORD, TestApp};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_login_then_me_returns_same_account() {
    let app = TestApp::new();
    let id = app
        .create_account(Role::Company, "hr@acme.example", STRONG_PASSWORD)
        .await;

    let response = app
        .login(Role::Company, "hr@acme.example", STRONG_PASSWORD)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["id"], id.to_string());
    assert!(response.body.get("refreshToken").is_none());
    assert!(response.body["user"].get("passwordHash").is_none());

    let cookie = response
        .set_cookie("company_refresh_token")
        .expect("refresh cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/auth/company"));

    let token = response.body["accessToken"].as_str().unwrap();
    let me = app
        .request("GET", "/auth/company/me", None, Some(token), None)
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], id.to_string());
    assert_eq!(me.body["role"], "company");
    assert_eq!(me.body["login"], "hr@acme.example");
}

#[tokio::test]
async fn test_login_uses_role_specific_field() {
    let app = TestApp::new();
    app.create_account(Role::Admin, "root", STRONG_PASSWORD).await;

    let response = app
        .request(
            "POST",
            "/auth/admin/login",
            Some(json!({ "username": "root", "password": STRONG_PASSWORD })),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_credentials_are_indistinguishable() {
    let app = TestApp::new();
    app.create_account(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;

    let wrong_password = app
        .login(Role::Undergraduate, "sam@uni.example", "Wrong-password-1!")
        .await;
    let unknown_user = app
        .login(Role::Undergraduate, "nobody@uni.example", STRONG_PASSWORD)
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(wrong_password.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_accounts_do_not_cross_roles() {
    let app = TestApp::new();
    app.create_account(Role::Company, "shared@acme.example", STRONG_PASSWORD)
        .await;

    let response = app
        .login(Role::Undergraduate, "shared@acme.example", STRONG_PASSWORD)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_missing_fields_is_validation_error() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/company/login",
            Some(json!({ "businessEmail": "hr@acme.example" })),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    let response = app
        .request(
            "POST",
            "/auth/company/login",
            Some(json!({ "businessEmail": "", "password": "x" })),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/auth/admin/me", None, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/auth/admin/me", None, Some("not-a-jwt"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_me_accepts_access_cookie() {
    let app = TestApp::new();
    app.create_account(Role::Admin, "root", STRONG_PASSWORD).await;
    let (access, _) = app.login_tokens(Role::Admin, "root", STRONG_PASSWORD).await;

    let cookie = format!("admin_access_token={access}");
    let response = app
        .request("GET", "/auth/admin/me", None, None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["login"], "root");
}

#[tokio::test]
async fn test_token_from_other_role_is_forbidden() {
    let app = TestApp::new();
    app.create_account(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;
    let (access, _) = app
        .login_tokens(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;

    let response = app
        .request("GET", "/auth/admin/me", None, Some(&access), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_me_for_deleted_account_is_not_found() {
    let app = TestApp::new();
    let id = app
        .create_account(Role::Company, "gone@acme.example", STRONG_PASSWORD)
        .await;
    let (access, _) = app
        .login_tokens(Role::Company, "gone@acme.example", STRONG_PASSWORD)
        .await;

    assert!(app.store.delete(id).await.unwrap());

    let response = app
        .request("GET", "/auth/company/me", None, Some(&access), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/undergraduate/register",
            Some(json!({
                "email": "New.Student@Uni.example",
                "password": STRONG_PASSWORD,
                "name": "New Student",
            })),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["login"], "new.student@uni.example");
    assert_eq!(response.body["displayName"], "New Student");
    assert!(response.body.get("passwordHash").is_none());

    let login = app
        .login(Role::Undergraduate, "new.student@uni.example", STRONG_PASSWORD)
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_ignores_surrounding_whitespace() {
    let app = TestApp::new();
    app.create_account(Role::Company, " hr@acme.example ", STRONG_PASSWORD)
        .await;

    let response = app
        .login(Role::Company, "  HR@acme.example\t", STRONG_PASSWORD)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["login"], "hr@acme.example");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_weak_passwords() {
    let app = TestApp::new();
    let body = json!({
        "businessEmail": "hr@acme.example",
        "password": STRONG_PASSWORD,
        "companyName": "Acme",
    });

    let first = app
        .request("POST", "/auth/company/register", Some(body.clone()), None, None)
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let duplicate = app
        .request("POST", "/auth/company/register", Some(body), None, None)
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let weak = app
        .request(
            "POST",
            "/auth/company/register",
            Some(json!({ "businessEmail": "other@acme.example", "password": "password" })),
            None,
            None,
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_cannot_self_register() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/admin/register",
            Some(json!({ "email": "a@b.example", "password": STRONG_PASSWORD })),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "connected");
}
