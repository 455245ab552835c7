//! Envelope defaults from configuration.
//!
//! A backend process loads one `[wrap]` table from its config file to
//! pick the default encoding and compression for newly written
//! envelopes:
//!
//! ```toml
//! [wrap]
//! encoding = "binary_message"
//! compression = "block_compressed"
//! ```
//!
//! Both keys accept `default` to defer to the built-in policy.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::options::{CompressionChoice, EncodingChoice, WrapOptions};

/// Default wrap choices for a backend process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    /// `default`, `structured_text`, or `binary_message`.
    pub encoding: EncodingChoice,
    /// `default`, `none`, or `block_compressed`.
    pub compression: CompressionChoice,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    wrap: WrapConfig,
}

impl WrapConfig {
    /// Loads the `[wrap]` table from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(file.wrap)
    }

    /// Serializes back to TOML, for config scaffolding.
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        let file = ConfigFile { wrap: *self };
        toml::to_string_pretty(&file).context("failed to serialize wrap config")
    }

    /// The wrap options these defaults select.
    pub fn options(&self) -> WrapOptions {
        WrapOptions {
            encoding: self.encoding,
            compression: self.compression,
        }
    }
}
