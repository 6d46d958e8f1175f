//! Integration tests for failed-login lockout.

mod helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};
use http::StatusCode;

use careerly_database::AccountStore;
use careerly_entity::{LoginAttemptState, Role};
use helpers::{STRONG_PASSWORD, TestApp};

const WRONG_PASSWORD: &str = "Wrong1!";

#[tokio::test]
async fn test_admin_locks_after_threshold() {
    let app = TestApp::new();
    app.create_account(Role::Admin, "a", STRONG_PASSWORD).await;

    for _ in 0..4 {
        let response = app.login(Role::Admin, "a", WRONG_PASSWORD).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid credentials");
    }

    // The fifth failure still answers 401 but locks the account.
    let response = app.login(Role::Admin, "a", WRONG_PASSWORD).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.login(Role::Admin, "a", STRONG_PASSWORD).await;
    assert_eq!(response.status.as_u16(), 423);
    assert_eq!(response.error_code(), "ACCOUNT_LOCKED");
    assert!(response.set_cookie("admin_refresh_token").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_failures_are_all_counted() {
    let app = Arc::new(TestApp::new());
    let id = app.create_account(Role::Admin, "a", STRONG_PASSWORD).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.login(Role::Admin, "a", WRONG_PASSWORD).await.status })
        })
        .collect();
    for handle in handles {
        let status = handle.await.unwrap();
        assert!(status == StatusCode::UNAUTHORIZED || status.as_u16() == 423);
    }

    let stored = app.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.failed_login_attempts, 5);

    let response = app.login(Role::Admin, "a", STRONG_PASSWORD).await;
    assert_eq!(response.status.as_u16(), 423);
}

#[tokio::test]
async fn test_locked_attempts_do_not_extend_lock() {
    let app = TestApp::new();
    let id = app.create_account(Role::Admin, "a", STRONG_PASSWORD).await;

    for _ in 0..5 {
        app.login(Role::Admin, "a", WRONG_PASSWORD).await;
    }
    let locked = app.store.find_by_id(id).await.unwrap().unwrap();
    let lock_until = locked.lock_until.expect("account should be locked");

    let response = app.login(Role::Admin, "a", WRONG_PASSWORD).await;
    assert_eq!(response.status.as_u16(), 423);

    let after = app.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(after.lock_until, Some(lock_until));
    assert_eq!(after.failed_login_attempts, locked.failed_login_attempts);
}

#[tokio::test]
async fn test_login_succeeds_after_window_and_resets_counter() {
    let app = TestApp::new();
    let id = app.create_account(Role::Admin, "a", STRONG_PASSWORD).await;

    for _ in 0..5 {
        app.login(Role::Admin, "a", WRONG_PASSWORD).await;
    }

    app.store
        .update_login_attempts(
            id,
            LoginAttemptState {
                failed_attempts: 5,
                lock_until: Some(Utc::now() - Duration::minutes(1)),
            },
        )
        .await
        .unwrap();

    let response = app.login(Role::Admin, "a", STRONG_PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);

    let account = app.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.failed_login_attempts, 0);
    assert!(account.lock_until.is_none());
    assert!(account.last_login.is_some());
}

#[tokio::test]
async fn test_success_resets_failure_count() {
    let app = TestApp::new();
    let id = app.create_account(Role::Admin, "a", STRONG_PASSWORD).await;

    for _ in 0..3 {
        app.login(Role::Admin, "a", WRONG_PASSWORD).await;
    }
    let response = app.login(Role::Admin, "a", STRONG_PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);

    // Four more failures stay below the threshold again.
    for _ in 0..4 {
        let response = app.login(Role::Admin, "a", WRONG_PASSWORD).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    let account = app.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.failed_login_attempts, 4);
    assert!(account.lock_until.is_none());
}

#[tokio::test]
async fn test_company_has_no_lockout_by_default() {
    let app = TestApp::new();
    app.create_account(Role::Company, "hr@acme.example", STRONG_PASSWORD)
        .await;

    for _ in 0..8 {
        let response = app
            .login(Role::Company, "hr@acme.example", WRONG_PASSWORD)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let response = app
        .login(Role::Company, "hr@acme.example", STRONG_PASSWORD)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_lockout_enabled_by_configuration() {
    let mut config = helpers::test_config();
    config.auth.undergraduate.lockout = Some(careerly_core::config::LockoutConfig {
        max_failed_attempts: 2,
        lockout_duration_minutes: 10,
    });
    let app = TestApp::with_config(config);
    app.create_account(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;

    for _ in 0..2 {
        app.login(Role::Undergraduate, "sam@uni.example", WRONG_PASSWORD)
            .await;
    }

    let response = app
        .login(Role::Undergraduate, "sam@uni.example", STRONG_PASSWORD)
        .await;
    assert_eq!(response.status.as_u16(), 423);
}
