//! argus-wrap — the persistence envelope.
//!
//! Resources are persisted inside an [`Envelope`]: the encoded (and
//! possibly compressed) value bytes plus everything needed to bring
//! the resource back. The envelope records the schema identity, the
//! encoding and compression tags, and the engine-stamped timestamps
//! and version tag.
//!
//! # Architecture
//!
//! ```text
//! wrap(resource, WrapOptions)
//!   ├── validate (skipped by wrap_without_validation)
//!   ├── Encoding: structured_text (serde JSON) | binary_message (protobuf)
//!   ├── Compression: none | block_compressed (lz4)
//!   └── Envelope { identity, tags, value }
//!
//! Envelope::unwrap(registry)
//!   ├── resolve identity → fresh instance
//!   ├── decompress → decode
//!   └── stamp created-at/updated-at/deleted-at labels + etag annotation
//! ```
//!
//! Unwrapping is storage-engine agnostic: any engine that stores
//! envelopes verbatim round-trips resources unchanged, modulo the
//! injected bookkeeping keys.

pub mod codec;
pub mod compress;
pub mod config;
pub mod envelope;
pub mod error;
pub mod list;
pub mod options;

pub use codec::Encoding;
pub use compress::Compression;
pub use config::WrapConfig;
pub use envelope::{
    CREATED_AT_LABEL, DELETED_AT_LABEL, ETAG_ANNOTATION, Envelope, UPDATED_AT_LABEL,
    strip_reserved_keys, wrap, wrap_without_validation,
};
pub use error::{WrapError, WrapResult};
pub use list::EnvelopeList;
pub use options::{CompressionChoice, EncodingChoice, WrapOptions};
