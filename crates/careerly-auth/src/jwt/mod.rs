//! JWT issuance and verification, one issuer per role.

pub mod claims;
pub mod issuer;

pub use claims::{Claims, TokenType};
pub use issuer::{IssuedToken, TokenIssuer, TokenPair};
