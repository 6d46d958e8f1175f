//! Refresh-token cookie helpers and token extraction from request headers.

use axum::http::header::{AUTHORIZATION, InvalidHeaderValue};
use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::CookieJar;

use careerly_core::error::AppError;
use careerly_entity::Role;

/// Path the refresh cookie is scoped to, so it only travels to that
/// role's session routes.
pub fn refresh_cookie_path(role: Role) -> String {
    format!("/auth/{}", role.as_str())
}

/// Build the `Set-Cookie` value carrying a refresh token.
pub fn refresh_cookie(
    role: Role,
    token: &str,
    max_age: chrono::Duration,
    secure: bool,
) -> Result<HeaderValue, AppError> {
    let cookie = format!(
        "{}={token}; Path={}; HttpOnly; SameSite=Strict; Max-Age={}",
        role.refresh_cookie_name(),
        refresh_cookie_path(role),
        max_age.num_seconds().max(0),
    );
    to_header(cookie, secure)
        .map_err(|e| AppError::internal(format!("Invalid refresh cookie value: {e}")))
}

/// Build the `Set-Cookie` value that removes the refresh cookie.
pub fn clear_refresh_cookie(role: Role, secure: bool) -> HeaderValue {
    let cookie = format!(
        "{}=; Path={}; HttpOnly; SameSite=Strict; Max-Age=0",
        role.refresh_cookie_name(),
        refresh_cookie_path(role),
    );
    // Role names and paths are ASCII literals.
    to_header(cookie, secure).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn to_header(mut cookie: String, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Value of the named cookie, if present and non-empty.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
