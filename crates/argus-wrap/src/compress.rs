//! Value compression.
//!
//! Compression applies to the encoded value bytes, after encoding and
//! before storage. Compressing cannot fail; decompressing fails on
//! malformed block data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{WrapError, WrapResult};

/// Compression applied to an envelope value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// Value bytes stored as-is.
    #[default]
    None = 0,
    /// lz4 block with a length prefix.
    BlockCompressed = 1,
}

impl Compression {
    /// Stable lowercase name, as recorded on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::BlockCompressed => "block_compressed",
        }
    }

    /// Compresses value bytes.
    pub fn compress(&self, value: Vec<u8>) -> Vec<u8> {
        match self {
            Compression::None => value,
            Compression::BlockCompressed => lz4_flex::compress_prepend_size(&value),
        }
    }

    /// Decompresses value bytes.
    pub fn decompress(&self, value: &[u8]) -> WrapResult<Vec<u8>> {
        match self {
            Compression::None => Ok(value.to_vec()),
            Compression::BlockCompressed => lz4_flex::decompress_size_prepended(value)
                .map_err(|e| WrapError::Compression(e.to_string())),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
