//! Request-surface error taxonomy.
//!
//! Every failure leaving a handler is an [`ApiError`]: one closed code
//! a transport can map to a status, plus a human message. Lower-layer
//! errors classify into codes here, so callers never match on store or
//! wrap internals.

use argus_core::ResolveError;
use argus_store::{PreconditionError, StoreError};
use argus_wrap::WrapError;
use std::fmt;
use thiserror::Error;

/// Result alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Closed set of failure classes a transport maps to statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed or contradictory request content.
    InvalidArgument,
    /// No live resource at the requested identity.
    NotFound,
    /// A create-only request hit an existing live resource.
    AlreadyExists,
    /// A conditional request's precondition did not hold.
    PreconditionFailed,
    /// Unexpected failure below the request surface.
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::PreconditionFailed => "precondition_failed",
            ErrorCode::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified handler failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            StoreError::NotValid(_) => ErrorCode::InvalidArgument,
            StoreError::PreconditionFailed(_) => ErrorCode::PreconditionFailed,
            StoreError::Internal(_) => ErrorCode::Internal,
        };
        Self::new(code, err.to_string())
    }
}

impl From<WrapError> for ApiError {
    fn from(err: WrapError) -> Self {
        StoreError::from(err).into()
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self::new(ErrorCode::NotFound, err.to_string())
    }
}

impl From<PreconditionError> for ApiError {
    fn from(err: PreconditionError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}
