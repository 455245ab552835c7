//! In-memory reference engine.
//!
//! Envelopes are keyed by the composite `namespace/name` form. Deletes
//! tombstone the envelope in place so hydration can still observe the
//! deletion timestamp; live reads skip tombstones, and create paths
//! over a tombstone revive the resource. Every write stamps
//! `updated_at` and a fresh version tag from a monotonic revision
//! counter.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use argus_core::{TypeRegistry, default_registry};
use argus_wrap::{Encoding, Envelope, EnvelopeList, strip_reserved_keys};

use crate::error::{StoreError, StoreResult};
use crate::etag::ETag;
use crate::id::StoreId;
use crate::patch::Patcher;
use crate::precondition::Conditions;
use crate::store::EnvelopeStore;

/// In-memory [`EnvelopeStore`] for tests and single-process
/// deployments.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Envelope>>,
    revision: AtomicU64,
    registry: Arc<TypeRegistry>,
}

impl MemoryStore {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            revision: AtomicU64::new(0),
            registry,
        }
    }

    /// Engine with the built-in type registrations.
    pub fn with_default_registry() -> Self {
        Self::new(Arc::new(default_registry()))
    }

    fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Stamps write-time bookkeeping onto an envelope about to be
    /// stored. A tombstoned predecessor counts as a fresh create.
    fn stamp(&self, envelope: &mut Envelope, existing: Option<&Envelope>) {
        let now = Utc::now();
        envelope.created_at = existing
            .filter(|e| e.deleted_at.is_none())
            .and_then(|e| e.created_at)
            .or(Some(now));
        envelope.updated_at = Some(now);
        envelope.deleted_at = None;
        envelope.etag = Some(ETag::digest(&envelope.value, self.next_revision()).to_string());
    }
}

fn live<'a>(entries: &'a HashMap<String, Envelope>, key: &str) -> Option<&'a Envelope> {
    entries.get(key).filter(|e| e.deleted_at.is_none())
}

fn current_etag(envelope: Option<&Envelope>) -> Option<ETag> {
    envelope.and_then(|e| e.etag.as_deref().map(ETag::from))
}

#[async_trait]
impl EnvelopeStore for MemoryStore {
    async fn create_or_update(
        &self,
        id: &StoreId,
        mut envelope: Envelope,
        conditions: &Conditions,
    ) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let key = id.to_string();
        let tag = current_etag(live(&entries, &key));
        conditions.check(tag.as_ref())?;
        self.stamp(&mut envelope, entries.get(&key));
        entries.insert(key, envelope);
        debug!(%id, "envelope stored");
        Ok(())
    }

    async fn create_if_not_exists(&self, id: &StoreId, mut envelope: Envelope) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let key = id.to_string();
        if live(&entries, &key).is_some() {
            return Err(StoreError::AlreadyExists(key));
        }
        self.stamp(&mut envelope, entries.get(&key));
        entries.insert(key, envelope);
        debug!(%id, "envelope created");
        Ok(())
    }

    async fn update_if_exists(
        &self,
        id: &StoreId,
        mut envelope: Envelope,
        conditions: &Conditions,
    ) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let key = id.to_string();
        let tag = match live(&entries, &key) {
            Some(current) => current_etag(Some(current)),
            None => return Err(StoreError::NotFound(key)),
        };
        conditions.check(tag.as_ref())?;
        self.stamp(&mut envelope, entries.get(&key));
        entries.insert(key, envelope);
        debug!(%id, "envelope updated");
        Ok(())
    }

    async fn get(&self, id: &StoreId) -> StoreResult<Envelope> {
        let entries = self.entries.read().await;
        let key = id.to_string();
        live(&entries, &key)
            .cloned()
            .ok_or(StoreError::NotFound(key))
    }

    async fn delete(&self, id: &StoreId) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let key = id.to_string();
        match entries.get_mut(&key) {
            Some(envelope) if envelope.deleted_at.is_none() => {
                let now = Utc::now();
                envelope.deleted_at = Some(now);
                envelope.updated_at = Some(now);
                envelope.etag =
                    Some(ETag::digest(&envelope.value, self.next_revision()).to_string());
                debug!(%id, "envelope tombstoned");
                Ok(())
            }
            _ => Err(StoreError::NotFound(key)),
        }
    }

    async fn list(&self, namespace: &str) -> StoreResult<EnvelopeList> {
        let prefix = format!("{namespace}/");
        let entries = self.entries.read().await;
        let mut matches: Vec<(&String, &Envelope)> = entries
            .iter()
            .filter(|(key, envelope)| key.starts_with(&prefix) && envelope.deleted_at.is_none())
            .collect();
        matches.sort_by(|a, b| a.0.cmp(b.0));
        Ok(matches
            .into_iter()
            .map(|(_, envelope)| envelope.clone())
            .collect::<Vec<_>>()
            .into())
    }

    async fn exists(&self, id: &StoreId) -> StoreResult<bool> {
        let entries = self.entries.read().await;
        Ok(live(&entries, &id.to_string()).is_some())
    }

    async fn patch(
        &self,
        id: &StoreId,
        patcher: &dyn Patcher,
        conditions: &Conditions,
    ) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let key = id.to_string();
        let stored = match live(&entries, &key) {
            Some(envelope) => envelope.clone(),
            None => return Err(StoreError::NotFound(key)),
        };
        conditions.check(current_etag(Some(&stored)).as_ref())?;

        // Patch against the hydrated structured-text form regardless
        // of how the envelope is encoded at rest.
        let resource = stored.unwrap(&self.registry)?;
        let registration = self.registry.resolve(&stored.type_meta)?;
        let original = match registration.to_json(resource.as_ref()) {
            Some(result) => result.map_err(|e| StoreError::Internal(e.to_string()))?,
            None => {
                return Err(StoreError::Internal(format!(
                    "registration mismatch for {}",
                    stored.type_meta
                )));
            }
        };

        let patched = patcher.apply(&original)?;
        let mut updated = registration
            .from_json(&patched)
            .map_err(|e| StoreError::NotValid(format!("patched document: {e}")))?;
        updated
            .validate()
            .map_err(|e| StoreError::NotValid(e.to_string()))?;
        strip_reserved_keys(updated.metadata_mut());

        // Re-encode with the stored envelope's own tags, so a patch
        // never silently changes the wire form.
        let encoded = match stored.encoding {
            Encoding::StructuredText => match registration.to_json(updated.as_ref()) {
                Some(result) => result.map_err(|e| StoreError::Internal(e.to_string()))?,
                None => {
                    return Err(StoreError::Internal(format!(
                        "registration mismatch for {}",
                        stored.type_meta
                    )));
                }
            },
            Encoding::BinaryMessage => updated.to_protobuf().ok_or_else(|| {
                StoreError::Internal(format!("{} has no binary form", stored.type_meta))
            })?,
        };

        let mut next = stored;
        next.value = next.compression.compress(encoded);
        self.stamp(&mut next, entries.get(&key));
        entries.insert(key, next);
        debug!(%id, "envelope patched");
        Ok(())
    }
}
