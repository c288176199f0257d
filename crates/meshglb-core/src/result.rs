//! Convenience result type alias for meshglb.

use crate::error::AppError;

/// A specialized `Result` type for meshglb operations.
///
/// Every host operation returns this, so that importers, exporters and the
/// pipeline share one error vocabulary.
pub type AppResult<T> = Result<T, AppError>;
