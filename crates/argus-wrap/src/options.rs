//! Wrap-time configuration.
//!
//! Callers pass a [`WrapOptions`] value; each field is a selector that
//! either forces a concrete choice or defers to the default policy.
//! The default encoding prefers the binary form when the resource
//! supports one; the default compression is the block compressor.

use serde::{Deserialize, Serialize};

use crate::compress::Compression;

/// Encoding selector, resolved against the resource at wrap time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingChoice {
    /// Binary message when the resource supports it, structured text
    /// otherwise.
    #[default]
    Default,
    StructuredText,
    BinaryMessage,
}

/// Compression selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionChoice {
    /// Block compression.
    #[default]
    Default,
    None,
    BlockCompressed,
}

impl CompressionChoice {
    /// The concrete compression this choice selects.
    pub fn resolve(self) -> Compression {
        match self {
            CompressionChoice::Default | CompressionChoice::BlockCompressed => {
                Compression::BlockCompressed
            }
            CompressionChoice::None => Compression::None,
        }
    }
}

/// Options controlling how a resource is wrapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapOptions {
    pub encoding: EncodingChoice,
    pub compression: CompressionChoice,
}

impl WrapOptions {
    /// Structured text, uncompressed. The envelope value is then the
    /// exact serde JSON encoding of the resource.
    pub fn plain_text() -> Self {
        Self {
            encoding: EncodingChoice::StructuredText,
            compression: CompressionChoice::None,
        }
    }
}
