//! argus-api — the call-level request surface over the store.
//!
//! Adapts transport-shaped requests (route identity, headers, raw JSON
//! bodies) into envelope-store operations and classifies every failure
//! into one closed [`ErrorCode`]. Routing, auth, and the HTTP layer
//! itself live elsewhere.
//!
//! # Architecture
//!
//! ```text
//! PatchHandler ──── content type ─► Merge patcher
//!              ──── If-Match / If-None-Match ─► Conditions
//!              ──── identity check ─► store.patch (atomic)
//!
//! ResourceHandlers<R> ── create / update / get / delete / list
//!              body ─► R ─► wrap ─► EnvelopeStore
//!              get  ─► Envelope ─► hydrate ─► JSON bytes
//! ```
//!
//! Both surfaces share one rule: a request body may echo its own
//! identity, but a non-empty `metadata.namespace` or `metadata.name`
//! differing from the route is rejected before any store work.

pub mod error;
pub mod handlers;
pub mod patch;

pub use error::{ApiError, ApiResult, ErrorCode};
pub use handlers::ResourceHandlers;
pub use patch::{
    JSON_PATCH_CONTENT_TYPE, MERGE_PATCH_CONTENT_TYPE, PatchHandler, PatchRequest,
    parse_conditions,
};
