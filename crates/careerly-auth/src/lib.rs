//! # careerly-auth
//!
//! Authentication and session lifecycle for the three Careerly actor types.
//!
//! ## Modules
//!
//! - `jwt`: per-role access/refresh token issuance and verification
//! - `password`: Argon2id password hashing and strength policy
//! - `lockout`: failed-login counting and temporary account locks
//! - `session`: login, refresh rotation, logout and expired-token cleanup

pub mod jwt;
pub mod lockout;
pub mod password;
pub mod session;

pub use jwt::{Claims, IssuedToken, TokenIssuer, TokenPair, TokenType};
pub use lockout::LockoutPolicy;
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{
    LoginOutcome, RefreshOutcome, RefreshTokenStore, RegisterAccount, SessionManager,
    TokenCleanup,
};
