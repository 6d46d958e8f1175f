//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use careerly_api::{AppState, build_router};
use careerly_auth::RegisterAccount;
use careerly_core::config::AppConfig;
use careerly_database::{AccountStore, MemoryAccountStore};
use careerly_entity::Role;

/// A password that satisfies the strength policy.
pub const STRONG_PASSWORD: &str = "Vq7#mLp2!xRz9wKt";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct session-manager access
    pub state: AppState,
    /// Backing store, for inspecting and adjusting persisted state
    pub store: Arc<MemoryAccountStore>,
}

impl TestApp {
    /// Create a new test application over an in-memory store
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a customized configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryAccountStore::new());
        let accounts: Arc<dyn AccountStore> = store.clone();
        let state = AppState::new(config, accounts).expect("Failed to build app state");
        let router = build_router(state.clone());

        Self {
            router,
            state,
            store,
        }
    }

    /// Create an account directly, bypassing the HTTP layer
    pub async fn create_account(&self, role: Role, login: &str, password: &str) -> Uuid {
        self.state
            .sessions(role)
            .create_account(RegisterAccount {
                login: login.to_string(),
                password: password.to_string(),
                display_name: Some(format!("Test {role}")),
            })
            .await
            .expect("Failed to create test account")
            .id
    }

    /// Log in and return the response
    pub async fn login(&self, role: Role, login: &str, password: &str) -> TestResponse {
        let mut body = serde_json::Map::new();
        body.insert(role.login_field().to_string(), Value::from(login));
        body.insert("password".to_string(), Value::from(password));

        self.request(
            "POST",
            &format!("/auth/{role}/login"),
            Some(Value::Object(body)),
            None,
            None,
        )
        .await
    }

    /// Log in and return `(access_token, refresh_token)`
    pub async fn login_tokens(&self, role: Role, login: &str, password: &str) -> (String, String) {
        let response = self.login(role, login, password).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);

        let access = response.body["accessToken"]
            .as_str()
            .expect("No access token in body")
            .to_string();
        let refresh = response
            .cookie_value(&role.refresh_cookie_name())
            .expect("No refresh cookie set");
        (access, refresh)
    }

    /// Send a request carrying an optional bearer token and cookie header
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            set_cookies,
        }
    }

    /// Call a session route authenticated by the role's refresh cookie
    pub async fn with_refresh_cookie(
        &self,
        method: &str,
        role: Role,
        route: &str,
        refresh_token: &str,
    ) -> TestResponse {
        let cookie = format!("{}={refresh_token}", role.refresh_cookie_name());
        self.request(method, &format!("/auth/{role}/{route}"), None, None, Some(&cookie))
            .await
    }
}

/// Configuration for tests: default realms, non-secure cookies.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.cookie_secure = false;
    config
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Raw `Set-Cookie` header values
    pub set_cookies: Vec<String>,
}

impl TestResponse {
    /// The `Set-Cookie` header for the named cookie
    pub fn set_cookie(&self, name: &str) -> Option<&str> {
        let prefix = format!("{name}=");
        self.set_cookies
            .iter()
            .map(String::as_str)
            .find(|c| c.starts_with(&prefix))
    }

    /// Value of the named cookie, if it was set to a non-empty value
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        let header = self.set_cookie(name)?;
        let value = header.split(';').next()?.split_once('=')?.1;
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Whether the response clears the named cookie
    pub fn clears_cookie(&self, name: &str) -> bool {
        self.set_cookie(name)
            .is_some_and(|c| c.starts_with(&format!("{name}=;")) && c.contains("Max-Age=0"))
    }

    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
