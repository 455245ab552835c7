//! Store addressing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of one resource within the store.
///
/// Displays as the composite `namespace/name` key engines and log
/// lines use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId {
    /// Owning namespace. Empty for cluster-wide resources.
    pub namespace: String,
    /// Resource name, unique within the namespace.
    pub name: String,
}

impl StoreId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
