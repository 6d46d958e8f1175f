//! Actor type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three actor types that authenticate against Careerly.
///
/// Each role is an independent realm: separate accounts, signing secrets,
/// cookies and routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Hiring company.
    Company,
    /// Undergraduate applicant.
    Undergraduate,
}

impl Role {
    /// All roles, in routing order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Company, Role::Undergraduate];

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Company => "company",
            Self::Undergraduate => "undergraduate",
        }
    }

    /// Name of the cookie carrying this role's refresh token.
    pub fn refresh_cookie_name(&self) -> String {
        format!("{}_refresh_token", self.as_str())
    }

    /// Name of the optional cookie carrying this role's access token.
    pub fn access_cookie_name(&self) -> String {
        format!("{}_access_token", self.as_str())
    }

    /// JSON field holding the login identifier in login requests.
    pub fn login_field(&self) -> &'static str {
        match self {
            Self::Admin => "username",
            Self::Company => "businessEmail",
            Self::Undergraduate => "email",
        }
    }

    /// Whether accounts of this role may self-register.
    pub fn allows_self_registration(&self) -> bool {
        !matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = careerly_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "company" => Ok(Self::Company),
            "undergraduate" => Ok(Self::Undergraduate),
            _ => Err(careerly_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, company, undergraduate"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Company".parse::<Role>().unwrap(), Role::Company);
        assert_eq!(
            "UNDERGRADUATE".parse::<Role>().unwrap(),
            Role::Undergraduate
        );
        assert!("student".parse::<Role>().is_err());
    }

    #[test]
    fn test_cookie_names() {
        assert_eq!(Role::Admin.refresh_cookie_name(), "admin_refresh_token");
        assert_eq!(
            Role::Undergraduate.refresh_cookie_name(),
            "undergraduate_refresh_token"
        );
        assert_eq!(Role::Company.access_cookie_name(), "company_access_token");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Company).unwrap();
        assert_eq!(json, "\"company\"");
        let role: Role = serde_json::from_str("\"undergraduate\"").unwrap();
        assert_eq!(role, Role::Undergraduate);
    }
}
