//! Password hashing and policy enforcement.

pub mod hasher;
pub mod validator;

pub use hasher::{MAX_PASSWORD_LENGTH, PasswordHasher};
pub use validator::PasswordValidator;
