//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use careerly_core::error::AppError;

/// Longest accepted plaintext, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 100;

/// Plaintext behind the throwaway digest used for unknown accounts.
const DUMMY_PASSWORD: &str = "careerly-unknown-account";

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        if password.chars().count() > MAX_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(false)` on mismatch and for over-long input. Fails only
    /// when the stored digest cannot be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        if password.chars().count() > MAX_PASSWORD_LENGTH {
            return Ok(false);
        }

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Runs a full verification against a throwaway digest and reports a
    /// mismatch.
    ///
    /// Used when no account matches a login, so the response costs the same
    /// Argon2 work as a wrong password.
    pub fn verify_unknown(&self, password: &str) -> bool {
        let digest = DUMMY_HASH.get_or_init(|| self.hash(DUMMY_PASSWORD).ok());
        if let Some(digest) = digest {
            let _ = self.verify(password, digest);
        }
        false
    }
}
