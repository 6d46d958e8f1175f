//! Integration tests for refresh rotation and logout.

mod helpers;

use http::StatusCode;

use careerly_entity::Role;
use helpers::{STRONG_PASSWORD, TestApp};

const COOKIE: &str = "undergraduate_refresh_token";

async fn signed_in(app: &TestApp) -> (String, String) {
    app.create_account(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;
    app.login_tokens(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let app = TestApp::new();
    let (_, refresh) = signed_in(&app).await;

    let response = app
        .with_refresh_cookie("POST", Role::Undergraduate, "refresh", &refresh)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let access = response.body["accessToken"].as_str().unwrap().to_string();
    let rotated = response.cookie_value(COOKIE).expect("rotated cookie");
    assert_ne!(rotated, refresh);

    let me = app
        .request("GET", "/auth/undergraduate/me", None, Some(&access), None)
        .await;
    assert_eq!(me.status, StatusCode::OK);

    let again = app
        .with_refresh_cookie("POST", Role::Undergraduate, "refresh", &rotated)
        .await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_replayed_refresh_token_is_rejected() {
    let app = TestApp::new();
    let (_, refresh) = signed_in(&app).await;

    let first = app
        .with_refresh_cookie("POST", Role::Undergraduate, "refresh", &refresh)
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let replay = app
        .with_refresh_cookie("POST", Role::Undergraduate, "refresh", &refresh)
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.body["message"], "Invalid refresh token");
    assert!(replay.clears_cookie(COOKIE));
}

#[tokio::test]
async fn test_refresh_without_cookie() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/auth/company/refresh", None, None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.clears_cookie("company_refresh_token"));
}

#[tokio::test]
async fn test_refresh_token_is_bound_to_its_role() {
    let app = TestApp::new();
    let (_, refresh) = signed_in(&app).await;

    let response = app
        .with_refresh_cookie("POST", Role::Company, "refresh", &refresh)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = TestApp::new();
    let (access, _) = signed_in(&app).await;

    let response = app
        .with_refresh_cookie("POST", Role::Undergraduate, "refresh", &access)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_and_is_idempotent() {
    let app = TestApp::new();
    let (_, refresh) = signed_in(&app).await;

    let logout = app
        .with_refresh_cookie("POST", Role::Undergraduate, "logout", &refresh)
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert!(logout.clears_cookie(COOKIE));

    let again = app
        .with_refresh_cookie("POST", Role::Undergraduate, "logout", &refresh)
        .await;
    assert_eq!(again.status, StatusCode::OK);

    let without_cookie = app
        .request("POST", "/auth/undergraduate/logout", None, None, None)
        .await;
    assert_eq!(without_cookie.status, StatusCode::OK);

    let refresh = app
        .with_refresh_cookie("POST", Role::Undergraduate, "refresh", &refresh)
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_only_ends_one_session() {
    let app = TestApp::new();
    let (_, laptop) = signed_in(&app).await;
    let (_, phone) = app
        .login_tokens(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;

    app.with_refresh_cookie("POST", Role::Undergraduate, "logout", &laptop)
        .await;

    let response = app
        .with_refresh_cookie("POST", Role::Undergraduate, "refresh", &phone)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_all_ends_every_session() {
    let app = TestApp::new();
    let (_, laptop) = signed_in(&app).await;
    let (_, phone) = app
        .login_tokens(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;

    let response = app
        .with_refresh_cookie("DELETE", Role::Undergraduate, "logout", &laptop)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.clears_cookie(COOKIE));

    for token in [&laptop, &phone] {
        let response = app
            .with_refresh_cookie("POST", Role::Undergraduate, "refresh", token)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_concurrent_refresh_with_same_token_succeeds_once() {
    let app = TestApp::new();
    let (_, refresh) = signed_in(&app).await;

    let (a, b) = tokio::join!(
        app.with_refresh_cookie("POST", Role::Undergraduate, "refresh", &refresh),
        app.with_refresh_cookie("POST", Role::Undergraduate, "refresh", &refresh),
    );

    let ok = [a.status, b.status]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    assert_eq!(ok, 1);
}
