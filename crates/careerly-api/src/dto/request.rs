//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use careerly_auth::RegisterAccount;

/// Login request body.
///
/// The login identifier is `username` for admins, `businessEmail` for
/// companies and `email` for undergraduates; all three are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email.
    #[serde(alias = "username", alias = "businessEmail", alias = "email")]
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Self-registration request body (company and undergraduate).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email used as the login.
    #[serde(alias = "businessEmail", alias = "email")]
    #[validate(email(message = "A valid email address is required"))]
    pub login: String,
    /// Password.
    #[validate(length(min = 1, max = 100, message = "Password is required (max 100 characters)"))]
    pub password: String,
    /// Company or student name.
    #[serde(default, alias = "companyName", alias = "name")]
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub display_name: Option<String>,
}

impl From<RegisterRequest> for RegisterAccount {
    fn from(req: RegisterRequest) -> Self {
        Self {
            login: req.login,
            password: req.password,
            display_name: req.display_name,
        }
    }
}
