//! # careerly-database
//!
//! Account persistence for Careerly: the [`AccountStore`] trait, a
//! PostgreSQL implementation backed by sqlx and an in-memory implementation
//! for tests and single-process development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryAccountStore;
pub use repositories::PgAccountStore;
pub use store::AccountStore;
