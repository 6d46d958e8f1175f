//! Convenience result type alias for Careerly.

use crate::error::AppError;

/// A specialized `Result` type for Careerly operations.
pub type AppResult<T> = Result<T, AppError>;
