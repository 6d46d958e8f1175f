//! Session lifecycle: login, refresh rotation, logout and token cleanup.

pub mod cleanup;
pub mod manager;
pub mod store;

pub use cleanup::TokenCleanup;
pub use manager::{
    INVALID_CREDENTIALS, INVALID_REFRESH_TOKEN, LoginOutcome, RefreshOutcome, RegisterAccount,
    SessionManager,
};
pub use store::{RefreshTokenStore, token_digest};
