//! Store error taxonomy.

use argus_core::ResolveError;
use argus_wrap::WrapError;
use thiserror::Error;

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live resource at the requested key.
    #[error("not found: {0}")]
    NotFound(String),

    /// A create-only write hit an existing live resource.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The resource or patch content is invalid.
    #[error("not valid: {0}")]
    NotValid(String),

    /// A conditional write's precondition did not hold.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// Unexpected engine failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<WrapError> for StoreError {
    fn from(err: WrapError) -> Self {
        let message = err.to_string();
        match root(&err) {
            WrapError::Validation(_) | WrapError::Decode(_) => StoreError::NotValid(message),
            WrapError::Resolve(_) => StoreError::NotFound(message),
            _ => StoreError::Internal(message),
        }
    }
}

impl From<ResolveError> for StoreError {
    fn from(err: ResolveError) -> Self {
        StoreError::NotFound(err.to_string())
    }
}

/// Unwraps batch-item context down to the underlying failure.
fn root(err: &WrapError) -> &WrapError {
    match err {
        WrapError::Item { source, .. } => root(source),
        _ => err,
    }
}
