//! Auth handlers: login, refresh, logout, logout-all, me, register.
//!
//! Every handler is generic over the realm and mounted once per role.

use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use careerly_auth::session::INVALID_REFRESH_TOKEN;
use careerly_core::error::AppError;
use careerly_entity::{AccountProfile, Realm};

use crate::cookies::{clear_refresh_cookie, read_cookie, refresh_cookie};
use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{LoginResponse, MessageResponse, RefreshResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthAccount, ValidatedJson};
use crate::state::AppState;

/// POST /auth/{role}/login
pub async fn login<R: Realm>(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let sessions = state.sessions(R::ROLE);
    let outcome = sessions.login(&req.login, &req.password).await?;

    let cookie = refresh_cookie(
        R::ROLE,
        &outcome.tokens.refresh_token,
        sessions.issuer().refresh_ttl(),
        state.config.auth.cookie_secure,
    )?;

    let body = LoginResponse {
        access_token: outcome.tokens.access_token,
        access_expires_at: outcome.tokens.access_expires_at,
        user: outcome.account.profile(),
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// POST /auth/{role}/refresh
///
/// Reads the refresh token from the role's cookie only. Any failure clears
/// the cookie.
pub async fn refresh<R: Realm>(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let secure = state.config.auth.cookie_secure;

    match rotate::<R>(&state, &headers).await {
        Ok(response) => response,
        Err(err) => {
            ([(SET_COOKIE, clear_refresh_cookie(R::ROLE, secure))], ApiError(err)).into_response()
        }
    }
}

async fn rotate<R: Realm>(state: &AppState, headers: &HeaderMap) -> Result<Response, AppError> {
    let token = read_cookie(headers, &R::ROLE.refresh_cookie_name())
        .ok_or_else(|| AppError::unauthenticated(INVALID_REFRESH_TOKEN))?;

    let sessions = state.sessions(R::ROLE);
    let outcome = sessions.refresh(&token).await?;

    let cookie = refresh_cookie(
        R::ROLE,
        &outcome.tokens.refresh_token,
        sessions.issuer().refresh_ttl(),
        state.config.auth.cookie_secure,
    )?;

    let body = RefreshResponse {
        access_token: outcome.tokens.access_token,
        access_expires_at: outcome.tokens.access_expires_at,
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /auth/{role}/logout
///
/// Revokes the presented refresh token. Always succeeds.
pub async fn logout<R: Realm>(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = read_cookie(&headers, &R::ROLE.refresh_cookie_name()) {
        state.sessions(R::ROLE).logout(&token).await;
    }

    cleared::<R>(&state, "Logged out successfully")
}

/// DELETE /auth/{role}/logout
///
/// Revokes every refresh token of the account owning the presented token.
pub async fn logout_all<R: Realm>(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = read_cookie(&headers, &R::ROLE.refresh_cookie_name()) {
        state.sessions(R::ROLE).logout_all(&token).await;
    }

    cleared::<R>(&state, "Logged out of all sessions")
}

fn cleared<R: Realm>(state: &AppState, message: &str) -> Response {
    let cookie = clear_refresh_cookie(R::ROLE, state.config.auth.cookie_secure);
    ([(SET_COOKIE, cookie)], Json(MessageResponse::new(message))).into_response()
}

/// GET /auth/{role}/me
pub async fn me<R: Realm>(
    State(state): State<AppState>,
    auth: AuthAccount<R>,
) -> ApiResult<Json<AccountProfile>> {
    let profile = state.sessions(R::ROLE).profile(auth.account_id).await?;
    Ok(Json(profile))
}

/// POST /auth/{role}/register
pub async fn register<R: Realm>(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AccountProfile>)> {
    let account = state.sessions(R::ROLE).register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(account.profile())))
}
