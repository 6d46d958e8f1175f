//! Failed-login lockout.

pub mod policy;

pub use policy::LockoutPolicy;
