//! # careerly-api
//!
//! HTTP API layer for Careerly built on Axum.
//!
//! The session routes (`login`, `refresh`, `logout`, `me`, `register`) are
//! written once, generic over [`Realm`](careerly_entity::Realm), and mounted
//! under `/auth/admin`, `/auth/company` and `/auth/undergraduate`.

pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
