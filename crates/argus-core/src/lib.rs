//! argus-core — the resource model of the argus persistence layer.
//!
//! A resource is a named, namespaced object carrying identifying
//! metadata and a self-validation rule. This crate defines the
//! capability traits every stored type implements, the two metadata
//! blocks all resources share, the explicit type registry that
//! hydration resolves against, and the built-in resource types.
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry
//!   ├── Registration (constructor + erased JSON hooks)
//!   │     └── resolve(TypeMeta) → fresh Box<dyn Resource>
//!   ├── built-in types: Namespace, CheckConfig, Silenced
//!   └── legacy types through Compat<T>, e.g. Compat<Mutator>
//! ```
//!
//! Type resolution is explicit: a type participates in hydration only
//! after being registered, and an envelope naming an unregistered type
//! fails with [`ResolveError`] instead of panicking.

pub mod compat;
pub mod error;
pub mod meta;
pub mod registry;
pub mod resource;
pub mod resources;

pub use compat::{Compat, LegacyResource, Mutator};
pub use error::{ResolveError, ValidationError};
pub use meta::{ObjectMeta, TypeMeta};
pub use registry::{Registration, TypeRegistry, default_registry};
pub use resource::{Resource, TypeIdentified, Validatable};
pub use resources::{CheckConfig, Namespace, Silenced};
