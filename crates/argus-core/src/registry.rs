//! The explicit type registry.
//!
//! Hydration resolves the identity recorded on an envelope to a
//! [`Registration`] made at startup. There is no global table and no
//! reflective fallback: an unregistered identity is a plain
//! [`ResolveError`].

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::compat::{Compat, Mutator};
use crate::error::ResolveError;
use crate::meta::TypeMeta;
use crate::resource::Resource;
use crate::resources::{CheckConfig, Namespace, Silenced};

/// Constructor and erased codec hooks captured when a type registers.
#[derive(Clone, Copy)]
pub struct Registration {
    new_boxed: fn() -> Box<dyn Resource>,
    from_json: fn(&[u8]) -> Result<Box<dyn Resource>, serde_json::Error>,
    to_json: fn(&dyn Resource) -> Option<Result<Vec<u8>, serde_json::Error>>,
}

impl Registration {
    /// A fresh default instance of the registered type.
    pub fn new_boxed(&self) -> Box<dyn Resource> {
        (self.new_boxed)()
    }

    /// Decodes structured text into a fresh instance.
    pub fn from_json(&self, buf: &[u8]) -> Result<Box<dyn Resource>, serde_json::Error> {
        (self.from_json)(buf)
    }

    /// Encodes an instance of the registered type as structured text.
    ///
    /// Returns `None` when `resource` is not an instance of this
    /// registration's type.
    pub fn to_json(&self, resource: &dyn Resource) -> Option<Result<Vec<u8>, serde_json::Error>> {
        (self.to_json)(resource)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}

/// Maps schema identities to registrations.
#[derive(Default)]
pub struct TypeRegistry {
    entries: HashMap<TypeMeta, Registration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `R` under its own reported identity.
    ///
    /// A later registration for the same identity replaces the earlier
    /// one.
    pub fn register<R>(&mut self) -> &mut Self
    where
        R: Resource + Default + Serialize + DeserializeOwned,
    {
        let meta = R::default().type_meta();
        self.entries.insert(
            meta,
            Registration {
                new_boxed: || Box::new(R::default()),
                from_json: |buf| {
                    serde_json::from_slice::<R>(buf).map(|r| Box::new(r) as Box<dyn Resource>)
                },
                to_json: |resource| {
                    resource
                        .as_any()
                        .downcast_ref::<R>()
                        .map(|typed| serde_json::to_vec(typed))
                },
            },
        );
        self
    }

    /// Resolves a schema identity to its registration.
    pub fn resolve(&self, meta: &TypeMeta) -> Result<&Registration, ResolveError> {
        self.entries
            .get(meta)
            .ok_or_else(|| ResolveError::UnknownType(meta.clone()))
    }

    pub fn contains(&self, meta: &TypeMeta) -> bool {
        self.entries.contains_key(meta)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A registry holding the built-in resource types.
pub fn default_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<Namespace>()
        .register::<CheckConfig>()
        .register::<Silenced>()
        .register::<Compat<Mutator>>();
    registry
}
