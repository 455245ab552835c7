//! Value encodings.
//!
//! An envelope records which of the two supported encodings produced
//! its value bytes. Structured text is serde JSON; binary message is
//! the type's protobuf form, available only for types with a binary
//! schema.

use std::fmt;

use argus_core::Resource;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{WrapError, WrapResult};

/// Wire encoding of an envelope value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// serde JSON text.
    #[default]
    StructuredText = 0,
    /// Protobuf bytes, for types with a binary schema.
    BinaryMessage = 1,
}

impl Encoding {
    /// Stable lowercase name, as recorded on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::StructuredText => "structured_text",
            Encoding::BinaryMessage => "binary_message",
        }
    }

    /// Encodes a resource into this encoding's byte form.
    pub fn encode<R>(&self, resource: &R) -> WrapResult<Vec<u8>>
    where
        R: Resource + Serialize,
    {
        match self {
            Encoding::StructuredText => {
                serde_json::to_vec(resource).map_err(|e| WrapError::Encode(e.to_string()))
            }
            Encoding::BinaryMessage => resource.to_protobuf().ok_or_else(|| {
                WrapError::Encode(format!(
                    "binary-message encoding requested, but {} does not support it",
                    resource.type_meta()
                ))
            }),
        }
    }

    /// Decodes value bytes into an existing target, replacing its
    /// previous contents.
    ///
    /// Structured text deserializes over the target; binary message
    /// merges into a fresh instance and moves it in, so a reused
    /// target never keeps stale repeated fields or default-valued
    /// scalars absent from the wire. On failure the target is left as
    /// it was.
    pub fn decode_into<R>(&self, buf: &[u8], target: &mut R) -> WrapResult<()>
    where
        R: Resource + Default + DeserializeOwned,
    {
        match self {
            Encoding::StructuredText => {
                *target =
                    serde_json::from_slice(buf).map_err(|e| WrapError::Decode(e.to_string()))?;
                Ok(())
            }
            Encoding::BinaryMessage => {
                let mut fresh = R::default();
                match fresh.merge_protobuf(buf) {
                    Some(result) => {
                        result.map_err(|e| WrapError::Decode(e.to_string()))?;
                        *target = fresh;
                        Ok(())
                    }
                    None => Err(WrapError::Decode(format!(
                        "binary-message decoding requested, but {} does not support it",
                        target.type_meta()
                    ))),
                }
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
