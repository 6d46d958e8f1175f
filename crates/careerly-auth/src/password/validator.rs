//! Password policy enforcement for newly registered accounts.

use careerly_core::config::AuthConfig;
use careerly_core::error::AppError;

use super::hasher::MAX_PASSWORD_LENGTH;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let length = password.chars().count();

        if length < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if length > MAX_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(AppError::validation(
                "Password must contain at least one special character",
            ));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password.",
            ));
        }

        Ok(())
    }
}
