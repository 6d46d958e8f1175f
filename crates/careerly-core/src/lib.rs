//! # careerly-core
//!
//! Core crate for Careerly. Contains the configuration schemas and the
//! unified error system shared by every other crate.
//!
//! This crate has **no** internal dependencies on other Careerly crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
