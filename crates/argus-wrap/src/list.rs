//! Envelope batches.
//!
//! Storage engines return pages of envelopes; [`EnvelopeList`] hydrates
//! a whole page at once, either into freshly resolved boxed resources
//! or into a caller-supplied typed vector.

use argus_core::{Resource, TypeRegistry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::{WrapError, WrapResult};

/// An ordered batch of envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeList(pub Vec<Envelope>);

impl EnvelopeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, envelope: Envelope) {
        self.0.push(envelope);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Envelope> {
        self.0.iter()
    }

    /// Hydrates every element through the registry, in order.
    ///
    /// All-or-nothing: the first failure aborts the batch, reporting
    /// the failing element's index.
    pub fn unwrap_all(&self, registry: &TypeRegistry) -> WrapResult<Vec<Box<dyn Resource>>> {
        let mut resources = Vec::with_capacity(self.0.len());
        for (index, envelope) in self.0.iter().enumerate() {
            let resource = envelope.unwrap(registry).map_err(|source| WrapError::Item {
                index,
                source: Box::new(source),
            })?;
            resources.push(resource);
        }
        Ok(resources)
    }

    /// Hydrates every element into a caller-supplied typed vector.
    ///
    /// An empty batch returns without touching the target. Otherwise
    /// the target is resized to exactly the batch length: surviving
    /// elements are overwritten in place, new slots are freshly
    /// allocated, excess elements are dropped.
    pub fn unwrap_all_into<R>(&self, target: &mut Vec<R>) -> WrapResult<()>
    where
        R: Resource + Default + DeserializeOwned,
    {
        if self.0.is_empty() {
            return Ok(());
        }
        target.resize_with(self.0.len(), R::default);
        for (index, (envelope, slot)) in self.0.iter().zip(target.iter_mut()).enumerate() {
            envelope.unwrap_into(slot).map_err(|source| WrapError::Item {
                index,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}

impl From<Vec<Envelope>> for EnvelopeList {
    fn from(envelopes: Vec<Envelope>) -> Self {
        Self(envelopes)
    }
}

impl IntoIterator for EnvelopeList {
    type Item = Envelope;
    type IntoIter = std::vec::IntoIter<Envelope>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
