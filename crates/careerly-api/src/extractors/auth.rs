//! `AuthAccount` extractor: pulls the access token from the request,
//! verifies it against the route's realm, and injects the identity.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;
use uuid::Uuid;

use careerly_auth::Claims;
use careerly_core::error::AppError;
use careerly_entity::{Realm, Role};

use crate::cookies::{bearer_token, read_cookie};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity of realm `R`, available in handlers.
#[derive(Debug, Clone)]
pub struct AuthAccount<R: Realm> {
    /// Account ID from the `sub` claim.
    pub account_id: Uuid,
    /// Role from the token.
    pub role: Role,
    /// Login identifier from the token.
    pub login: String,
    /// Full verified claims.
    pub claims: Claims,
    _realm: PhantomData<R>,
}

impl<R: Realm> FromRequestParts<AppState> for AuthAccount<R> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| read_cookie(&parts.headers, &R::ROLE.access_cookie_name()))
            .ok_or_else(|| AppError::unauthenticated("Missing access token"))?;

        let claims = match state.sessions(R::ROLE).issuer().verify_access_token(&token) {
            Ok(claims) => claims,
            Err(err) => {
                // A valid token from another realm is a known identity with the
                // wrong role.
                let other_realm = Role::ALL
                    .into_iter()
                    .filter(|role| *role != R::ROLE)
                    .find(|role| state.sessions(*role).issuer().verify_access_token(&token).is_ok());

                if let Some(role) = other_realm {
                    debug!(expected = %R::ROLE, actual = %role, "Access token for another role");
                    return Err(AppError::forbidden(format!(
                        "This endpoint requires a {} account",
                        R::ROLE
                    ))
                    .into());
                }
                return Err(err.into());
            }
        };

        Ok(Self {
            account_id: claims.sub,
            role: claims.role,
            login: claims.login.clone(),
            claims,
            _realm: PhantomData,
        })
    }
}
