//! Generic per-resource CRUD surface.
//!
//! [`ResourceHandlers`] adapts route-shaped calls into store
//! operations for one resource type: JSON bodies in, hydrated JSON
//! out, with the identity-immutability rule shared with the patch
//! surface. No routing or transport lives here.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use argus_core::{Resource, TypeRegistry};
use argus_store::{Conditions, EnvelopeStore, StoreId};
use argus_wrap::{Envelope, WrapOptions, strip_reserved_keys, wrap};

use crate::error::{ApiError, ApiResult};
use crate::patch::check_meta;

/// CRUD handlers for one resource type over one store.
pub struct ResourceHandlers<R, S> {
    store: Arc<S>,
    registry: Arc<TypeRegistry>,
    options: WrapOptions,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S> ResourceHandlers<R, S>
where
    R: Resource + Default + Serialize + DeserializeOwned,
    S: EnvelopeStore,
{
    pub fn new(store: Arc<S>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            store,
            registry,
            options: WrapOptions::default(),
            _resource: PhantomData,
        }
    }

    /// Overrides the wrap-time encoding and compression choices.
    pub fn with_options(mut self, options: WrapOptions) -> Self {
        self.options = options;
        self
    }

    /// Creates the resource, failing when a live one already exists.
    pub async fn create(
        &self,
        namespace: &str,
        name: &str,
        payload: &[u8],
        principal: Option<&str>,
    ) -> ApiResult<()> {
        let envelope = self.prepare(namespace, name, payload, principal)?;
        self.store
            .create_if_not_exists(&StoreId::new(namespace, name), envelope)
            .await?;
        debug!(%namespace, %name, "resource created");
        Ok(())
    }

    /// Creates or replaces the resource, honoring conditions.
    pub async fn update(
        &self,
        namespace: &str,
        name: &str,
        payload: &[u8],
        principal: Option<&str>,
        conditions: &Conditions,
    ) -> ApiResult<()> {
        let envelope = self.prepare(namespace, name, payload, principal)?;
        self.store
            .create_or_update(&StoreId::new(namespace, name), envelope, conditions)
            .await?;
        debug!(%namespace, %name, "resource updated");
        Ok(())
    }

    /// Fetches and hydrates the resource as JSON bytes.
    pub async fn get(&self, namespace: &str, name: &str) -> ApiResult<Vec<u8>> {
        let envelope = self.store.get(&StoreId::new(namespace, name)).await?;
        let mut resource = R::default();
        envelope.unwrap_into(&mut resource)?;
        serde_json::to_vec(&resource).map_err(|e| ApiError::internal(e.to_string()))
    }

    /// Tombstones the resource.
    pub async fn delete(&self, namespace: &str, name: &str) -> ApiResult<()> {
        self.store.delete(&StoreId::new(namespace, name)).await?;
        debug!(%namespace, %name, "resource deleted");
        Ok(())
    }

    /// Lists the namespace's live resources as a hydrated JSON array.
    ///
    /// Hydration runs through the registry, so a namespace holding
    /// several resource types still lists completely.
    pub async fn list(&self, namespace: &str) -> ApiResult<Vec<u8>> {
        let envelopes = self.store.list(namespace).await?;
        let resources = envelopes.unwrap_all(&self.registry)?;
        let mut items = Vec::with_capacity(resources.len());
        for resource in &resources {
            let registration = self.registry.resolve(&resource.type_meta())?;
            let json = match registration.to_json(resource.as_ref()) {
                Some(result) => result.map_err(|e| ApiError::internal(e.to_string()))?,
                None => {
                    return Err(ApiError::internal(format!(
                        "registration mismatch for {}",
                        resource.type_meta()
                    )));
                }
            };
            let value: Value =
                serde_json::from_slice(&json).map_err(|e| ApiError::internal(e.to_string()))?;
            items.push(value);
        }
        serde_json::to_vec(&items).map_err(|e| ApiError::internal(e.to_string()))
    }

    /// Decodes and wraps a write body: identity check, route identity
    /// filled into empty metadata fields, principal recorded, reserved
    /// keys stripped before the value is encoded.
    fn prepare(
        &self,
        namespace: &str,
        name: &str,
        payload: &[u8],
        principal: Option<&str>,
    ) -> ApiResult<Envelope> {
        check_meta(payload, namespace, name)?;
        let mut resource: R = serde_json::from_slice(payload)
            .map_err(|e| ApiError::invalid_argument(format!("malformed request body: {e}")))?;

        let meta = resource.metadata_mut();
        if meta.namespace.is_empty() {
            meta.namespace = namespace.to_string();
        }
        if meta.name.is_empty() {
            meta.name = name.to_string();
        }
        if let Some(principal) = principal {
            meta.created_by = principal.to_string();
        }
        strip_reserved_keys(meta);

        Ok(wrap(&resource, self.options)?)
    }
}
