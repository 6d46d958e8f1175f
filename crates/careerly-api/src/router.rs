//! Route definitions for the Careerly HTTP API.
//!
//! Session routes are written once, generic over the realm, and nested
//! under `/auth/{role}` for each of the three actor types.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use careerly_entity::{AdminRealm, CompanyRealm, Realm, UndergraduateRealm};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::build_cors_layer(&state.config.server.cors);
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .merge(realm_routes::<AdminRealm>())
        .merge(realm_routes::<CompanyRealm>())
        .merge(realm_routes::<UndergraduateRealm>())
        .route("/health", get(handlers::health::health))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::redact_internal_errors,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::request_logging))
        .with_state(state)
}

/// Session endpoints for one realm: login, refresh, logout, me, register.
fn realm_routes<R: Realm>() -> Router<AppState> {
    let mut routes = Router::new()
        .route("/login", post(handlers::auth::login::<R>))
        .route("/refresh", post(handlers::auth::refresh::<R>))
        .route(
            "/logout",
            post(handlers::auth::logout::<R>).delete(handlers::auth::logout_all::<R>),
        )
        .route("/me", get(handlers::auth::me::<R>));

    if R::ROLE.allows_self_registration() {
        routes = routes.route("/register", post(handlers::auth::register::<R>));
    }

    Router::new().nest(&format!("/auth/{}", R::ROLE.as_str()), routes)
}
