//! The patch request surface.
//!
//! [`PatchHandler`] turns a transport-shaped request into one atomic
//! store patch: content-type selection, conditional-header parsing,
//! and the identity-immutability check all happen here, so the store
//! only ever sees well-formed work.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use argus_store::{Conditions, EnvelopeStore, Merge, Precondition, StoreId};

use crate::error::{ApiError, ApiResult};

/// RFC 7396 merge-patch body.
pub const MERGE_PATCH_CONTENT_TYPE: &str = "application/merge-patch+json";
/// RFC 6902 patch body. Recognized, not yet applied.
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// A patch request as a transport would deliver it.
#[derive(Debug, Clone)]
pub struct PatchRequest {
    /// Namespace segment of the route.
    pub namespace: String,
    /// Name segment of the route.
    pub name: String,
    /// Body content type. Absent defaults to merge patch.
    pub content_type: Option<String>,
    /// Raw If-Match header value.
    pub if_match: Option<String>,
    /// Raw If-None-Match header value.
    pub if_none_match: Option<String>,
    /// The patch document.
    pub body: Vec<u8>,
}

/// Applies patch requests against one store.
pub struct PatchHandler<S> {
    store: Arc<S>,
}

impl<S: EnvelopeStore> PatchHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Runs the request through selection, conditions, the identity
    /// check, and one atomic store patch. Success has no body.
    pub async fn handle(&self, request: PatchRequest) -> ApiResult<()> {
        validate_content_type(request.content_type.as_deref())?;
        let conditions =
            parse_conditions(request.if_match.as_deref(), request.if_none_match.as_deref())?;
        check_meta(&request.body, &request.namespace, &request.name)?;

        let id = StoreId::new(request.namespace, request.name);
        let patcher = Merge::new(request.body);
        self.store.patch(&id, &patcher, &conditions).await?;
        debug!(%id, "merge patch applied");
        Ok(())
    }
}

fn validate_content_type(content_type: Option<&str>) -> ApiResult<()> {
    match content_type {
        None | Some(MERGE_PATCH_CONTENT_TYPE) => Ok(()),
        Some(JSON_PATCH_CONTENT_TYPE) => Err(ApiError::invalid_argument(
            "json-patch bodies are not supported yet",
        )),
        Some(other) => Err(ApiError::invalid_argument(format!(
            "unsupported patch content type {other:?}"
        ))),
    }
}

/// Parses conditional header values into store [`Conditions`].
pub fn parse_conditions(
    if_match: Option<&str>,
    if_none_match: Option<&str>,
) -> ApiResult<Conditions> {
    let mut conditions = Conditions::new();
    if let Some(raw) = if_match {
        conditions.if_match = Some(Precondition::parse(raw)?);
    }
    if let Some(raw) = if_none_match {
        conditions.if_none_match = Some(Precondition::parse(raw)?);
    }
    Ok(conditions)
}

#[derive(Debug, Default, Deserialize)]
struct MetaProbe {
    #[serde(default)]
    metadata: Option<MetaFields>,
}

#[derive(Debug, Default, Deserialize)]
struct MetaFields {
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    name: String,
}

/// Rejects a body trying to move the resource to another identity.
///
/// Only non-empty values are compared, so a body may omit metadata
/// entirely or echo empty fields. Malformed body text is rejected
/// here rather than deeper in the store.
pub(crate) fn check_meta(body: &[u8], namespace: &str, name: &str) -> ApiResult<()> {
    let probe: MetaProbe = serde_json::from_slice(body)
        .map_err(|e| ApiError::invalid_argument(format!("malformed request body: {e}")))?;
    let Some(meta) = probe.metadata else {
        return Ok(());
    };
    if !meta.namespace.is_empty() && meta.namespace != namespace {
        warn!(%namespace, body_namespace = %meta.namespace, "identity change rejected");
        return Err(ApiError::invalid_argument(
            "metadata.namespace does not match the request namespace",
        ));
    }
    if !meta.name.is_empty() && meta.name != name {
        warn!(%name, body_name = %meta.name, "identity change rejected");
        return Err(ApiError::invalid_argument(
            "metadata.name does not match the request name",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::{CheckConfig, ObjectMeta};
    use argus_store::MemoryStore;
    use argus_wrap::{WrapOptions, wrap};
    use serde_json::json;

    use crate::error::ErrorCode;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    // ── Identity immutability ──────────────────────────────────────

    #[test]
    fn meta_check_passes_without_metadata() {
        assert!(check_meta(&body(json!({"timeout": 5})), "default", "web").is_ok());
    }

    #[test]
    fn meta_check_passes_on_matching_identity() {
        let payload = body(json!({"metadata": {"namespace": "default", "name": "web"}}));
        assert!(check_meta(&payload, "default", "web").is_ok());
    }

    #[test]
    fn meta_check_passes_on_empty_values() {
        let payload = body(json!({"metadata": {"namespace": "", "name": ""}}));
        assert!(check_meta(&payload, "default", "web").is_ok());
    }

    #[test]
    fn meta_check_rejects_namespace_change() {
        let payload = body(json!({"metadata": {"namespace": "other"}}));
        let err = check_meta(&payload, "default", "web").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert!(err.message.contains("namespace"));
    }

    #[test]
    fn meta_check_rejects_name_change() {
        let payload = body(json!({"metadata": {"name": "db"}}));
        let err = check_meta(&payload, "default", "web").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert!(err.message.contains("name"));
    }

    #[test]
    fn meta_check_rejects_malformed_body() {
        let err = check_meta(b"{not json", "default", "web").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    // ── Content types ──────────────────────────────────────────────

    #[test]
    fn absent_content_type_defaults_to_merge() {
        assert!(validate_content_type(None).is_ok());
        assert!(validate_content_type(Some(MERGE_PATCH_CONTENT_TYPE)).is_ok());
    }

    #[test]
    fn json_patch_content_type_is_recognized_but_rejected() {
        let err = validate_content_type(Some(JSON_PATCH_CONTENT_TYPE)).unwrap_err();
        assert!(err.message.contains("not supported yet"));
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let err = validate_content_type(Some("text/plain")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    // ── Conditional headers ────────────────────────────────────────

    #[test]
    fn conditions_parse_wildcard_and_tag_lists() {
        let conditions = parse_conditions(Some("*"), Some("\"abc\", \"def\"")).unwrap();
        assert_eq!(conditions.if_match, Some(Precondition::Any));
        assert!(matches!(
            conditions.if_none_match,
            Some(Precondition::Tags(ref tags)) if tags.len() == 2
        ));
    }

    #[test]
    fn malformed_condition_is_rejected() {
        let err = parse_conditions(Some("\"half"), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    // ── End to end ─────────────────────────────────────────────────

    #[tokio::test]
    async fn handler_patches_through_the_store() {
        let store = Arc::new(MemoryStore::with_default_registry());
        let check = CheckConfig {
            metadata: Some(ObjectMeta::namespaced("default", "web")),
            command: "check-http.rb -u /healthz".to_string(),
            interval: 30,
            timeout: 10,
            subscriptions: vec!["web".to_string()],
            publish: true,
        };
        store
            .create_if_not_exists(
                &StoreId::new("default", "web"),
                wrap(&check, WrapOptions::default()).unwrap(),
            )
            .await
            .unwrap();

        let handler = PatchHandler::new(Arc::clone(&store));
        handler
            .handle(PatchRequest {
                namespace: "default".to_string(),
                name: "web".to_string(),
                content_type: Some(MERGE_PATCH_CONTENT_TYPE.to_string()),
                if_match: None,
                if_none_match: None,
                body: body(json!({"interval": 60})),
            })
            .await
            .unwrap();

        let envelope = store.get(&StoreId::new("default", "web")).await.unwrap();
        let mut patched = CheckConfig::default();
        envelope.unwrap_into(&mut patched).unwrap();
        assert_eq!(patched.interval, 60);
    }
}
