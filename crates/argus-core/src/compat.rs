//! Previous-generation resource support.
//!
//! Older types expose the flat accessor surface of [`LegacyResource`]
//! instead of the current capability traits. [`Compat`] adapts such a
//! type to [`Resource`] once, at the boundary where it enters the
//! store; everything downstream handles it like any other resource.
//!
//! Legacy types have no binary schema, so an adapted resource always
//! encodes as structured text.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::meta::{ObjectMeta, TypeMeta};
use crate::resource::{Resource, TypeIdentified, Validatable};

/// API group version for previous-generation resources.
pub const API_VERSION: &str = "core/v1";

/// Capability surface of previous-generation resource types.
///
/// Legacy types always carry an [`ObjectMeta`] directly and report
/// their identity under the `core/v1` group.
pub trait LegacyResource: Validatable + fmt::Debug + Send + Sync + 'static {
    fn object_meta(&self) -> &ObjectMeta;

    fn object_meta_mut(&mut self) -> &mut ObjectMeta;

    fn legacy_type_meta(&self) -> TypeMeta;
}

/// Adapter presenting a legacy type as a [`Resource`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Compat<T>(pub T);

impl<T: LegacyResource> Validatable for Compat<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate()
    }
}

impl<T: LegacyResource> TypeIdentified for Compat<T> {
    fn type_meta(&self) -> TypeMeta {
        self.0.legacy_type_meta()
    }
}

impl<T: LegacyResource> Resource for Compat<T> {
    fn metadata(&self) -> Option<&ObjectMeta> {
        Some(self.0.object_meta())
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        self.0.object_meta_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A legacy event mutator definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mutator {
    /// Instance metadata.
    pub metadata: ObjectMeta,
    /// Command executed against the event payload.
    pub command: String,
    /// Execution timeout in seconds.
    pub timeout: u32,
    /// Environment variables passed to the command.
    pub env_vars: Vec<String>,
}

impl Validatable for Mutator {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.metadata.name.is_empty() {
            return Err(ValidationError::Empty("metadata.name"));
        }
        if self.command.is_empty() {
            return Err(ValidationError::Empty("command"));
        }
        Ok(())
    }
}

impl LegacyResource for Mutator {
    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn object_meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }

    fn legacy_type_meta(&self) -> TypeMeta {
        TypeMeta::new("Mutator", API_VERSION)
    }
}
