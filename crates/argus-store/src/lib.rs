//! argus-store — the storage protocol around envelopes.
//!
//! Defines the surface a storage engine implements ([`EnvelopeStore`]),
//! the version tags and conditional-write rules riding on every write,
//! and the merge-patch primitive. Ships one engine, [`MemoryStore`],
//! used by tests and single-process deployments.
//!
//! # Architecture
//!
//! ```text
//! EnvelopeStore (async trait)
//!   ├── create_or_update / create_if_not_exists / update_if_exists
//!   ├── get / list / exists / delete (tombstone)
//!   └── patch(id, Patcher, Conditions)   one atomic read-modify-write
//!
//! Conditions { if_match, if_none_match } ── evaluated against ETag
//! Merge (RFC 7396) ── rewrites the structured-text form
//! ```
//!
//! Writes never block each other partially: an engine applies the
//! condition check and the write as one step, so a stale tag always
//! loses with [`StoreError::PreconditionFailed`] and never clobbers a
//! concurrent update.

pub mod error;
pub mod etag;
pub mod id;
pub mod memory;
pub mod patch;
pub mod precondition;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use etag::ETag;
pub use id::StoreId;
pub use memory::MemoryStore;
pub use patch::{Merge, Patcher};
pub use precondition::{Conditions, Precondition, PreconditionError};
pub use store::EnvelopeStore;
