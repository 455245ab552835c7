//! Resource identity and instance metadata.
//!
//! Every stored resource carries two metadata blocks: a [`TypeMeta`]
//! naming its schema (bare type name plus API group version) and an
//! [`ObjectMeta`] naming the instance (namespace and name) along with
//! its labels and annotations.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema identity of a resource type.
///
/// The `(type_name, api_version)` pair is the lookup key for type
/// resolution. Two resources sharing the pair share a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMeta {
    /// Bare type name, e.g. `CheckConfig`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// API group and version, e.g. `core/v2`.
    pub api_version: String,
}

impl TypeMeta {
    pub fn new(type_name: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            api_version: api_version.into(),
        }
    }
}

impl fmt::Display for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.api_version, self.type_name)
    }
}

/// Instance metadata shared by every resource.
///
/// Labels and annotations are plain string maps and are always
/// materialized; hydration never leaves them absent.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    /// Resource name, unique within its namespace.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Owning namespace. Empty for cluster-wide resources.
    #[prost(string, tag = "2")]
    pub namespace: String,
    /// Identifying key/value pairs, usable for selection.
    #[prost(map = "string, string", tag = "3")]
    pub labels: HashMap<String, String>,
    /// Non-identifying key/value pairs.
    #[prost(map = "string, string", tag = "4")]
    pub annotations: HashMap<String, String>,
    /// Principal that created the resource, when known.
    #[prost(string, tag = "5")]
    pub created_by: String,
}

impl ObjectMeta {
    /// Metadata with just a namespace and name set.
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Sets a label, replacing any existing value under the key.
    pub fn set_label(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(key.into(), value.into());
    }

    /// Sets an annotation, replacing any existing value under the key.
    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(key.into(), value.into());
    }
}
