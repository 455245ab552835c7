//! The persistence envelope.
//!
//! An [`Envelope`] is the unit a storage engine persists: the encoded
//! value bytes plus the schema identity, the encoding and compression
//! tags, the engine-stamped timestamps, and the version tag.
//!
//! Wrapping validates and encodes. Unwrapping resolves the type,
//! decodes, and injects the envelope's bookkeeping into the resource's
//! metadata, so API consumers see creation time, update time, deletion
//! time, and the version tag as ordinary labels and annotations under
//! the reserved `argus.io/` keys.

use argus_core::{ObjectMeta, Resource, TypeMeta, TypeRegistry};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::Encoding;
use crate::compress::Compression;
use crate::error::{WrapError, WrapResult};
use crate::options::{EncodingChoice, WrapOptions};

/// Label key carrying the creation timestamp after hydration.
pub const CREATED_AT_LABEL: &str = "argus.io/created-at";
/// Label key carrying the last-update timestamp after hydration.
pub const UPDATED_AT_LABEL: &str = "argus.io/updated-at";
/// Label key carrying the deletion timestamp, present only on
/// tombstones.
pub const DELETED_AT_LABEL: &str = "argus.io/deleted-at";
/// Annotation key carrying the version tag after hydration.
pub const ETAG_ANNOTATION: &str = "argus.io/etag";

/// A persisted resource: value bytes plus the facts needed to restore
/// and version them.
///
/// Timestamps and the version tag are stamped by the storage engine;
/// a freshly wrapped envelope carries none of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Schema identity used to resolve the target type at hydration.
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Encoding of `value`.
    #[serde(default)]
    pub encoding: Encoding,
    /// Compression applied to `value` after encoding.
    #[serde(default)]
    pub compression: Compression,
    /// The resource's encoded bytes.
    pub value: Vec<u8>,
    /// Stamped at first write.
    pub created_at: Option<DateTime<Utc>>,
    /// Stamped on every write.
    pub updated_at: Option<DateTime<Utc>>,
    /// Set when the resource is logically deleted while its envelope
    /// remains.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Version tag, new on every successful write.
    pub etag: Option<String>,
}

/// Validates, encodes, and compresses a resource into an [`Envelope`].
pub fn wrap<R>(resource: &R, options: WrapOptions) -> WrapResult<Envelope>
where
    R: Resource + Serialize,
{
    resource.validate()?;
    wrap_without_validation(resource, options)
}

/// Like [`wrap`] but skips the resource's own validation.
///
/// For trusted internal writers that have already validated, or must
/// persist a resource that no longer passes current rules.
pub fn wrap_without_validation<R>(resource: &R, options: WrapOptions) -> WrapResult<Envelope>
where
    R: Resource + Serialize,
{
    let (encoding, encoded) = match options.encoding {
        EncodingChoice::Default => match resource.to_protobuf() {
            Some(buf) => (Encoding::BinaryMessage, buf),
            None => (
                Encoding::StructuredText,
                Encoding::StructuredText.encode(resource)?,
            ),
        },
        EncodingChoice::StructuredText => (
            Encoding::StructuredText,
            Encoding::StructuredText.encode(resource)?,
        ),
        EncodingChoice::BinaryMessage => (
            Encoding::BinaryMessage,
            Encoding::BinaryMessage.encode(resource)?,
        ),
    };
    let compression = options.compression.resolve();
    Ok(Envelope {
        type_meta: resource.type_meta(),
        encoding,
        compression,
        value: compression.compress(encoded),
        created_at: None,
        updated_at: None,
        deleted_at: None,
        etag: None,
    })
}

impl Envelope {
    /// Restores the resource, resolving its concrete type through the
    /// registry.
    pub fn unwrap(&self, registry: &TypeRegistry) -> WrapResult<Box<dyn Resource>> {
        let registration = registry.resolve(&self.type_meta)?;
        let value = self.compression.decompress(&self.value)?;
        let mut resource = match self.encoding {
            Encoding::StructuredText => registration
                .from_json(&value)
                .map_err(|e| WrapError::Decode(e.to_string()))?,
            Encoding::BinaryMessage => {
                let mut fresh = registration.new_boxed();
                match fresh.merge_protobuf(&value) {
                    Some(result) => result.map_err(|e| WrapError::Decode(e.to_string()))?,
                    None => {
                        return Err(WrapError::Decode(format!(
                            "binary-message decoding requested, but {} does not support it",
                            self.type_meta
                        )));
                    }
                }
                fresh
            }
        };
        self.stamp_metadata(resource.metadata_mut());
        Ok(resource)
    }

    /// Restores the resource into a caller-supplied target of known
    /// type, skipping registry resolution.
    pub fn unwrap_into<R>(&self, target: &mut R) -> WrapResult<()>
    where
        R: Resource + Default + DeserializeOwned,
    {
        let value = self.compression.decompress(&self.value)?;
        self.encoding.decode_into(&value, target)?;
        self.stamp_metadata(target.metadata_mut());
        Ok(())
    }

    /// Whether the resource has been logically deleted.
    pub fn is_tombstone(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Writes the envelope's bookkeeping into resource metadata.
    ///
    /// Reserved keys always reflect the envelope; user-supplied values
    /// under the same keys are replaced. Other user keys are left
    /// alone.
    fn stamp_metadata(&self, meta: &mut ObjectMeta) {
        meta.set_label(CREATED_AT_LABEL, timestamp_label(self.created_at));
        meta.set_label(UPDATED_AT_LABEL, timestamp_label(self.updated_at));
        if self.deleted_at.is_some() {
            meta.set_label(DELETED_AT_LABEL, timestamp_label(self.deleted_at));
        }
        meta.set_annotation(ETAG_ANNOTATION, self.etag.clone().unwrap_or_default());
    }
}

/// Removes the hydration-injected keys from resource metadata.
///
/// Writers re-encoding a previously hydrated resource call this so the
/// bookkeeping keys are never baked into stored value bytes.
pub fn strip_reserved_keys(meta: &mut ObjectMeta) {
    meta.labels.remove(CREATED_AT_LABEL);
    meta.labels.remove(UPDATED_AT_LABEL);
    meta.labels.remove(DELETED_AT_LABEL);
    meta.annotations.remove(ETAG_ANNOTATION);
}

/// RFC 3339 text for a stamp, empty while the envelope is unstamped.
fn timestamp_label(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    use argus_core::{
        CheckConfig, Compat, Mutator, TypeIdentified, Validatable, ValidationError,
        default_registry,
    };
    use chrono::TimeZone;

    fn test_check(name: &str) -> CheckConfig {
        CheckConfig {
            metadata: Some(ObjectMeta::namespaced("default", name)),
            command: "check-http.rb -u /healthz".to_string(),
            interval: 30,
            timeout: 10,
            subscriptions: vec!["web".to_string()],
            publish: true,
        }
    }

    fn test_mutator(name: &str) -> Compat<Mutator> {
        Compat(Mutator {
            metadata: ObjectMeta::namespaced("default", name),
            command: "jq .check".to_string(),
            timeout: 5,
            env_vars: Vec::new(),
        })
    }

    /// Stamps an envelope the way an engine would.
    fn stamp(envelope: &mut Envelope, etag: &str) {
        let t = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        envelope.created_at = Some(t);
        envelope.updated_at = Some(t);
        envelope.etag = Some(etag.to_string());
    }

    // ── Wrapping ───────────────────────────────────────────────────

    #[test]
    fn default_options_prefer_binary_block() {
        let envelope = wrap(&test_check("web"), WrapOptions::default()).unwrap();
        assert_eq!(envelope.encoding, Encoding::BinaryMessage);
        assert_eq!(envelope.compression, Compression::BlockCompressed);
        assert_eq!(envelope.type_meta, TypeMeta::new("CheckConfig", "core/v2"));
    }

    #[test]
    fn text_only_type_falls_back_to_structured_text() {
        let envelope = wrap(&test_mutator("extract"), WrapOptions::default()).unwrap();
        assert_eq!(envelope.encoding, Encoding::StructuredText);
        assert_eq!(envelope.compression, Compression::BlockCompressed);
    }

    #[test]
    fn plain_text_value_is_exact_json() {
        let check = test_check("web");
        let envelope = wrap(&check, WrapOptions::plain_text()).unwrap();
        assert_eq!(envelope.value, serde_json::to_vec(&check).unwrap());
    }

    #[test]
    fn fresh_envelope_is_unstamped() {
        let envelope = wrap(&test_check("web"), WrapOptions::default()).unwrap();
        assert_eq!(envelope.created_at, None);
        assert_eq!(envelope.updated_at, None);
        assert_eq!(envelope.deleted_at, None);
        assert_eq!(envelope.etag, None);
        assert!(!envelope.is_tombstone());
    }

    #[test]
    fn invalid_resource_fails_wrap() {
        let mut check = test_check("web");
        check.command.clear();

        let err = wrap(&check, WrapOptions::default()).unwrap_err();

        assert!(matches!(err, WrapError::Validation(_)));
    }

    #[test]
    fn wrap_without_validation_accepts_invalid_resource() {
        let mut check = test_check("web");
        check.command.clear();

        assert!(wrap_without_validation(&check, WrapOptions::default()).is_ok());
    }

    #[test]
    fn explicit_binary_fails_for_text_only_type() {
        let options = WrapOptions {
            encoding: EncodingChoice::BinaryMessage,
            ..WrapOptions::default()
        };

        let err = wrap(&test_mutator("extract"), options).unwrap_err();

        assert!(matches!(err, WrapError::Encode(_)));
    }

    // ── Unwrapping ─────────────────────────────────────────────────

    #[test]
    fn round_trip_preserves_resource_modulo_stamps() {
        let registry = default_registry();
        let mut check = test_check("web");
        check.metadata_mut().set_label("team", "sre");

        let mut envelope = wrap(&check, WrapOptions::default()).unwrap();
        stamp(&mut envelope, "cafe01");

        let restored = envelope.unwrap(&registry).unwrap();
        let restored = restored.as_any().downcast_ref::<CheckConfig>().unwrap();

        assert_eq!(restored.command, check.command);
        assert_eq!(restored.subscriptions, check.subscriptions);

        let meta = restored.metadata.as_ref().unwrap();
        assert_eq!(meta.labels.get("team").unwrap(), "sre");
        assert_eq!(
            meta.labels.get(CREATED_AT_LABEL).unwrap(),
            "2026-03-14T09:26:53Z"
        );
        assert_eq!(
            meta.labels.get(UPDATED_AT_LABEL).unwrap(),
            "2026-03-14T09:26:53Z"
        );
        assert_eq!(meta.annotations.get(ETAG_ANNOTATION).unwrap(), "cafe01");
        assert!(!meta.labels.contains_key(DELETED_AT_LABEL));
    }

    #[test]
    fn stamps_replace_user_values_under_reserved_keys() {
        let registry = default_registry();
        let mut check = test_check("web");
        check.metadata_mut().set_label(CREATED_AT_LABEL, "spoofed");

        let mut envelope = wrap(&check, WrapOptions::default()).unwrap();
        stamp(&mut envelope, "cafe02");

        let restored = envelope.unwrap(&registry).unwrap();
        let restored = restored.as_any().downcast_ref::<CheckConfig>().unwrap();

        assert_eq!(
            restored.metadata.as_ref().unwrap().labels[CREATED_AT_LABEL],
            "2026-03-14T09:26:53Z"
        );
    }

    #[test]
    fn unstamped_envelope_hydrates_empty_stamp_labels() {
        let registry = default_registry();
        let envelope = wrap(&test_check("web"), WrapOptions::default()).unwrap();

        let restored = envelope.unwrap(&registry).unwrap();
        let restored = restored.as_any().downcast_ref::<CheckConfig>().unwrap();

        let meta = restored.metadata.as_ref().unwrap();
        assert_eq!(meta.labels[CREATED_AT_LABEL], "");
        assert_eq!(meta.annotations[ETAG_ANNOTATION], "");
    }

    #[test]
    fn tombstone_hydrates_deleted_at_label() {
        let registry = default_registry();
        let mut envelope = wrap(&test_check("web"), WrapOptions::default()).unwrap();
        stamp(&mut envelope, "cafe03");
        envelope.deleted_at = Some(Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());

        assert!(envelope.is_tombstone());

        let restored = envelope.unwrap(&registry).unwrap();
        let restored = restored.as_any().downcast_ref::<CheckConfig>().unwrap();

        assert_eq!(
            restored.metadata.as_ref().unwrap().labels[DELETED_AT_LABEL],
            "2026-03-15T00:00:00Z"
        );
    }

    #[test]
    fn unregistered_type_fails_with_resolve_error() {
        let registry = TypeRegistry::new();
        let envelope = wrap(&test_check("web"), WrapOptions::default()).unwrap();

        let err = envelope.unwrap(&registry).unwrap_err();

        assert!(matches!(err, WrapError::Resolve(_)));
    }

    #[test]
    fn unwrap_into_skips_resolution_and_stamps() {
        let mut envelope = wrap(&test_check("web"), WrapOptions::default()).unwrap();
        stamp(&mut envelope, "cafe04");

        let mut target = CheckConfig::default();
        envelope.unwrap_into(&mut target).unwrap();

        assert_eq!(target.command, "check-http.rb -u /healthz");
        assert_eq!(
            target.metadata.as_ref().unwrap().annotations[ETAG_ANNOTATION],
            "cafe04"
        );
    }

    #[test]
    fn legacy_round_trip_through_adapter() {
        let registry = default_registry();
        let mutator = test_mutator("extract");

        let envelope = wrap(&mutator, WrapOptions::default()).unwrap();
        let restored = envelope.unwrap(&registry).unwrap();
        let restored = restored.as_any().downcast_ref::<Compat<Mutator>>().unwrap();

        assert_eq!(restored.0.command, "jq .check");
    }

    #[test]
    fn strip_reserved_keys_removes_only_bookkeeping() {
        let mut meta = ObjectMeta::namespaced("default", "web");
        meta.set_label("team", "sre");
        meta.set_label(CREATED_AT_LABEL, "2026-01-01T00:00:00Z");
        meta.set_annotation(ETAG_ANNOTATION, "cafe05");
        meta.set_annotation("runbook", "https://wiki/runbooks/web");

        strip_reserved_keys(&mut meta);

        assert_eq!(meta.labels.len(), 1);
        assert!(meta.labels.contains_key("team"));
        assert_eq!(meta.annotations.len(), 1);
        assert!(meta.annotations.contains_key("runbook"));
    }

    // ── Edge cases ─────────────────────────────────────────────────

    /// A type reporting an empty type name. Wrapping succeeds; only
    /// hydration fails.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Anonymous {
        metadata: Option<ObjectMeta>,
    }

    impl Validatable for Anonymous {
        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    impl TypeIdentified for Anonymous {
        fn type_meta(&self) -> TypeMeta {
            TypeMeta::new("", "core/v2")
        }
    }

    impl Resource for Anonymous {
        fn metadata(&self) -> Option<&ObjectMeta> {
            self.metadata.as_ref()
        }

        fn metadata_mut(&mut self) -> &mut ObjectMeta {
            self.metadata.get_or_insert_with(ObjectMeta::default)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn empty_type_name_wraps_but_never_hydrates() {
        let registry = default_registry();
        let envelope = wrap(&Anonymous::default(), WrapOptions::default()).unwrap();

        assert_eq!(envelope.type_meta.type_name, "");
        assert!(matches!(
            envelope.unwrap(&registry).unwrap_err(),
            WrapError::Resolve(_)
        ));
    }

    #[test]
    fn corrupt_compressed_value_fails_unwrap() {
        let registry = default_registry();
        let mut envelope = wrap(&test_check("web"), WrapOptions::default()).unwrap();
        envelope.value.truncate(3);

        let err = envelope.unwrap(&registry).unwrap_err();

        assert!(matches!(err, WrapError::Compression(_)));
    }
}
