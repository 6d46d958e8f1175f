//! Type-level role markers.
//!
//! Handlers and extractors are written once, generic over `R: Realm`, and
//! mounted three times. The marker fixes which role's secrets, cookies and
//! accounts a route works with at compile time.

use super::role::Role;

/// A compile-time selector for one actor type.
pub trait Realm: Send + Sync + 'static {
    /// The role this realm authenticates.
    const ROLE: Role;
}

/// Admin accounts.
#[derive(Debug, Clone, Copy)]
pub struct AdminRealm;

/// Company accounts.
#[derive(Debug, Clone, Copy)]
pub struct CompanyRealm;

/// Undergraduate accounts.
#[derive(Debug, Clone, Copy)]
pub struct UndergraduateRealm;

impl Realm for AdminRealm {
    const ROLE: Role = Role::Admin;
}

impl Realm for CompanyRealm {
    const ROLE: Role = Role::Company;
}

impl Realm for UndergraduateRealm {
    const ROLE: Role = Role::Undergraduate;
}
