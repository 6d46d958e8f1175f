//! Hides internal error details from clients in production.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// Replaces the body of every 500 response with a generic message when the
/// server runs in production. Headers such as `Set-Cookie` are preserved.
pub async fn redact_internal_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status() != StatusCode::INTERNAL_SERVER_ERROR
        || !state.config.server.is_production()
    {
        return response;
    }

    let (mut parts, _body) = response.into_parts();
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    parts.headers.remove(axum::http::header::CONTENT_TYPE);

    let body = Json(ApiErrorResponse {
        error: "INTERNAL_ERROR".to_string(),
        message: "An internal error occurred".to_string(),
    });

    (parts, body).into_response()
}
