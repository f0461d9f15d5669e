//! Result type aliases for PieKit.

use crate::PieError;

/// A specialized `Result` type for PieKit operations.
pub type PieResult<T> = Result<T, PieError>;
