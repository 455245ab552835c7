//! The storage protocol.
//!
//! [`EnvelopeStore`] is the envelope-level surface a storage engine
//! implements. Writes are conditional: a [`Conditions`] value carries
//! the caller's version expectations and the engine enforces them
//! atomically with the write itself.

use async_trait::async_trait;

use argus_wrap::{Envelope, EnvelopeList};

use crate::error::StoreResult;
use crate::id::StoreId;
use crate::patch::Patcher;
use crate::precondition::Conditions;

/// Envelope-level storage engine surface.
///
/// Engines store envelopes verbatim apart from the write-time stamps:
/// `created_at` on first write, `updated_at` and a fresh `etag` on
/// every write, `deleted_at` on delete. Deletes tombstone rather than
/// erase, and live reads skip tombstones.
#[async_trait]
pub trait EnvelopeStore: Send + Sync {
    /// Writes the envelope, creating or replacing, honoring
    /// `conditions`. Replacing a tombstone revives the resource.
    async fn create_or_update(
        &self,
        id: &StoreId,
        envelope: Envelope,
        conditions: &Conditions,
    ) -> StoreResult<()>;

    /// Writes the envelope only if no live resource exists at `id`.
    async fn create_if_not_exists(&self, id: &StoreId, envelope: Envelope) -> StoreResult<()>;

    /// Writes the envelope only if a live resource exists at `id`.
    async fn update_if_exists(
        &self,
        id: &StoreId,
        envelope: Envelope,
        conditions: &Conditions,
    ) -> StoreResult<()>;

    /// Fetches the live envelope at `id`.
    async fn get(&self, id: &StoreId) -> StoreResult<Envelope>;

    /// Tombstones the resource at `id`.
    async fn delete(&self, id: &StoreId) -> StoreResult<()>;

    /// Lists live envelopes in a namespace, ordered by name.
    async fn list(&self, namespace: &str) -> StoreResult<EnvelopeList>;

    /// Whether a live resource exists at `id`.
    async fn exists(&self, id: &StoreId) -> StoreResult<bool>;

    /// Atomically rewrites the resource at `id` through `patcher`.
    ///
    /// Read, condition check, patch, validation, and write happen as
    /// one step; concurrent patches serialize, and a stale condition
    /// loses without observing a half-applied write.
    async fn patch(
        &self,
        id: &StoreId,
        patcher: &dyn Patcher,
        conditions: &Conditions,
    ) -> StoreResult<()>;
}
