//! Resource capability traits.
//!
//! A stored type implements three traits: [`Validatable`] for
//! self-validation, [`TypeIdentified`] for reporting its schema
//! identity, and [`Resource`] tying the two together with metadata
//! access and the optional binary wire form. All three are required at
//! compile time; there is no runtime capability probing.

use std::any::Any;
use std::fmt;

use crate::error::ValidationError;
use crate::meta::{ObjectMeta, TypeMeta};

/// Self-validation before persistence.
pub trait Validatable {
    /// Checks domain rules, returning the first violation found.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Reports the schema identity recorded on envelopes.
pub trait TypeIdentified {
    fn type_meta(&self) -> TypeMeta;
}

/// A storable resource.
///
/// Object-safe: stores and hydration paths handle `Box<dyn Resource>`
/// without knowing the concrete type. Types with a binary schema
/// override the protobuf hooks; structured-text-only types keep the
/// `None` defaults and always travel as text.
pub trait Resource: Validatable + TypeIdentified + fmt::Debug + Send + Sync + 'static {
    /// Instance metadata, when the resource carries any.
    fn metadata(&self) -> Option<&ObjectMeta>;

    /// Instance metadata, materializing an empty block when absent.
    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    /// Protobuf wire form, for types with a binary schema.
    fn to_protobuf(&self) -> Option<Vec<u8>> {
        None
    }

    /// Merges protobuf bytes into `self`, for types with a binary
    /// schema. `None` means the type has no binary form.
    fn merge_protobuf(&mut self, buf: &[u8]) -> Option<Result<(), prost::DecodeError>> {
        let _ = buf;
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
