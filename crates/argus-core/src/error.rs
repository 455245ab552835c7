//! Error types for the resource model.

use thiserror::Error;

use crate::meta::TypeMeta;

/// Errors produced by resource self-validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A field value violates a domain rule.
    #[error("{0}: {1}")]
    Invalid(&'static str, String),
}

/// Errors produced by type resolution against a registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The identity recorded on the envelope has no registration.
    #[error("unknown type {0}")]
    UnknownType(TypeMeta),
}
