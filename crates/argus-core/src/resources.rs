//! Built-in resource types.
//!
//! The types the monitoring backend persists most often. Each carries
//! an optional [`ObjectMeta`] as protobuf field 1 and implements the
//! full capability set, including the binary wire form.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::meta::{ObjectMeta, TypeMeta};
use crate::resource::{Resource, TypeIdentified, Validatable};

/// API group version for current-generation resources.
pub const API_VERSION: &str = "core/v2";

/// An isolation domain for named resources.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    /// Instance metadata. The namespace's own name lives here.
    #[prost(message, optional, tag = "1")]
    pub metadata: Option<ObjectMeta>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: Some(ObjectMeta {
                name: name.into(),
                ..ObjectMeta::default()
            }),
        }
    }
}

impl Validatable for Namespace {
    fn validate(&self) -> Result<(), ValidationError> {
        let meta = self
            .metadata
            .as_ref()
            .ok_or(ValidationError::Empty("metadata"))?;
        if meta.name.is_empty() {
            return Err(ValidationError::Empty("metadata.name"));
        }
        if meta.name.contains(['/', '\0']) {
            return Err(ValidationError::Invalid(
                "metadata.name",
                "must not contain '/' or null bytes".to_string(),
            ));
        }
        Ok(())
    }
}

impl TypeIdentified for Namespace {
    fn type_meta(&self) -> TypeMeta {
        TypeMeta::new("Namespace", API_VERSION)
    }
}

impl Resource for Namespace {
    fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        self.metadata.get_or_insert_with(ObjectMeta::default)
    }

    fn to_protobuf(&self) -> Option<Vec<u8>> {
        Some(prost::Message::encode_to_vec(self))
    }

    fn merge_protobuf(&mut self, buf: &[u8]) -> Option<Result<(), prost::DecodeError>> {
        Some(prost::Message::merge(self, buf))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Configuration for a scheduled service check.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Instance metadata.
    #[prost(message, optional, tag = "1")]
    pub metadata: Option<ObjectMeta>,
    /// Command executed on matching agents.
    #[prost(string, tag = "2")]
    pub command: String,
    /// Scheduling interval in seconds.
    #[prost(uint32, tag = "3")]
    pub interval: u32,
    /// Execution timeout in seconds. Zero means no timeout.
    #[prost(uint32, tag = "4")]
    pub timeout: u32,
    /// Agent subscriptions the check is published to.
    #[prost(string, repeated, tag = "5")]
    pub subscriptions: Vec<String>,
    /// Whether the check is actively scheduled.
    #[prost(bool, tag = "6")]
    pub publish: bool,
}

impl Validatable for CheckConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let meta = self
            .metadata
            .as_ref()
            .ok_or(ValidationError::Empty("metadata"))?;
        if meta.name.is_empty() {
            return Err(ValidationError::Empty("metadata.name"));
        }
        if self.command.is_empty() {
            return Err(ValidationError::Empty("command"));
        }
        if self.interval == 0 {
            return Err(ValidationError::Invalid(
                "interval",
                "must be greater than or equal to 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl TypeIdentified for CheckConfig {
    fn type_meta(&self) -> TypeMeta {
        TypeMeta::new("CheckConfig", API_VERSION)
    }
}

impl Resource for CheckConfig {
    fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        self.metadata.get_or_insert_with(ObjectMeta::default)
    }

    fn to_protobuf(&self) -> Option<Vec<u8>> {
        Some(prost::Message::encode_to_vec(self))
    }

    fn merge_protobuf(&mut self, buf: &[u8]) -> Option<Result<(), prost::DecodeError>> {
        Some(prost::Message::merge(self, buf))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A silencing entry suppressing notifications for matching events.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Silenced {
    /// Instance metadata.
    #[prost(message, optional, tag = "1")]
    pub metadata: Option<ObjectMeta>,
    /// Unix timestamp at which the entry expires. Negative means never.
    #[prost(int64, tag = "2")]
    pub expire_at: i64,
    /// Unix timestamp at which the silence takes effect.
    #[prost(int64, tag = "3")]
    pub begin: i64,
    /// Check name the entry matches. Empty matches every check.
    #[prost(string, tag = "4")]
    pub check: String,
    /// Subscription the entry matches. Empty matches every
    /// subscription.
    #[prost(string, tag = "5")]
    pub subscription: String,
    /// Human-readable reason for the silence.
    #[prost(string, tag = "6")]
    pub reason: String,
    /// Whether the entry clears when the matching check resolves.
    #[prost(bool, tag = "7")]
    pub expire_on_resolve: bool,
}

impl Validatable for Silenced {
    fn validate(&self) -> Result<(), ValidationError> {
        let meta = self
            .metadata
            .as_ref()
            .ok_or(ValidationError::Empty("metadata"))?;
        if meta.name.is_empty() {
            return Err(ValidationError::Empty("metadata.name"));
        }
        if self.check.is_empty() && self.subscription.is_empty() {
            return Err(ValidationError::Invalid(
                "check",
                "must provide a check or a subscription".to_string(),
            ));
        }
        Ok(())
    }
}

impl TypeIdentified for Silenced {
    fn type_meta(&self) -> TypeMeta {
        TypeMeta::new("Silenced", API_VERSION)
    }
}

impl Resource for Silenced {
    fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        self.metadata.get_or_insert_with(ObjectMeta::default)
    }

    fn to_protobuf(&self) -> Option<Vec<u8>> {
        Some(prost::Message::encode_to_vec(self))
    }

    fn merge_protobuf(&mut self, buf: &[u8]) -> Option<Result<(), prost::DecodeError>> {
        Some(prost::Message::merge(self, buf))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
