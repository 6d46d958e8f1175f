//! # careerly-entity
//!
//! Domain entity models for Careerly. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod account;

pub use account::{
    Account, AccountProfile, AdminRealm, CompanyRealm, LoginAttemptState, NewAccount, Realm,
    RefreshTokenRecord, Role, UndergraduateRealm,
};
