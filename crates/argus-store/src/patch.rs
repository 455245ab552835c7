//! Patch application.
//!
//! A [`Patcher`] rewrites a resource's structured-text form. The only
//! implementation is RFC 7396 merge patch; RFC 6902 JSON Patch is
//! recognized at the request surface but not supported.

use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Rewrites the structured-text form of a resource.
pub trait Patcher: Send + Sync {
    /// Applies the patch to `original`, returning the patched document.
    fn apply(&self, original: &[u8]) -> StoreResult<Vec<u8>>;
}

/// RFC 7396 JSON merge patch.
///
/// Objects merge recursively, `null` removes a key, and any other
/// value replaces the original. An empty `{}` patch is a no-op.
#[derive(Debug, Clone)]
pub struct Merge {
    /// The merge-patch document.
    pub patch: Vec<u8>,
}

impl Merge {
    pub fn new(patch: impl Into<Vec<u8>>) -> Self {
        Self {
            patch: patch.into(),
        }
    }
}

impl Patcher for Merge {
    fn apply(&self, original: &[u8]) -> StoreResult<Vec<u8>> {
        let mut doc: Value = serde_json::from_slice(original)
            .map_err(|e| StoreError::Internal(format!("stored document is not valid text: {e}")))?;
        let patch: Value = serde_json::from_slice(&self.patch)
            .map_err(|e| StoreError::NotValid(format!("malformed merge patch: {e}")))?;
        json_patch::merge(&mut doc, &patch);
        serde_json::to_vec(&doc).map_err(|e| StoreError::Internal(e.to_string()))
    }
}
