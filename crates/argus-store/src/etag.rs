//! Write version tags.
//!
//! Every successful write stamps the envelope with a new tag derived
//! from the value bytes and the engine's write revision. Conditional
//! requests compare tags to detect concurrent modification.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Opaque version tag, hex text on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    /// Computes the tag for a value at a given write revision.
    ///
    /// The revision participates in the digest, so rewriting identical
    /// bytes still produces a fresh tag.
    pub fn digest(value: &[u8], revision: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(revision.to_be_bytes());
        hasher.update(value);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ETag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl From<&str> for ETag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}
