//! Error types for envelope operations.

use argus_core::{ResolveError, ValidationError};
use thiserror::Error;

/// Result alias for envelope operations.
pub type WrapResult<T> = Result<T, WrapError>;

/// Errors produced while wrapping or unwrapping envelopes.
#[derive(Debug, Error)]
pub enum WrapError {
    /// The resource failed its own validation.
    #[error("resource validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The envelope's identity has no registration.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The resource could not be encoded in the requested form.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The envelope value could not be decoded into the target type.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The envelope value could not be decompressed.
    #[error("decompress failed: {0}")]
    Compression(String),

    /// A batch element failed; `index` is the element's position.
    #[error("wrap list item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<WrapError>,
    },
}
