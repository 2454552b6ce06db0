//! Remote store access for webhook registrations
//!
//! Abstracts the three operations the reconciler needs from the cluster,
//! enabling dependency injection and mocking for tests. The production
//! implementation is `kube::Api`; failures keep the raw `kube::Error` so
//! callers can classify them (409 conflict, 404 not found).

use async_trait::async_trait;
use kube::Api;
use kube::api::{Patch, PatchParams, PostParams};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Store operations needed to converge a single webhook registration
#[async_trait]
pub trait WebhookConfigurationStore<K>: Send + Sync {
    /// Create the registration; fails with a 409 API error when a
    /// registration of that name already exists
    async fn create(&self, desired: &K) -> Result<K, kube::Error>;

    /// Fetch the registration by name
    async fn get(&self, name: &str) -> Result<K, kube::Error>;

    /// Apply a strategic merge patch to the named registration. Fields
    /// absent from the document are left untouched on the remote object.
    async fn patch(&self, name: &str, document: &serde_json::Value) -> Result<K, kube::Error>;
}

#[async_trait]
impl<K> WebhookConfigurationStore<K> for Api<K>
where
    K: Clone + DeserializeOwned + Serialize + std::fmt::Debug + Send + Sync,
{
    async fn create(&self, desired: &K) -> Result<K, kube::Error> {
        Api::create(self, &PostParams::default(), desired).await
    }

    async fn get(&self, name: &str) -> Result<K, kube::Error> {
        Api::get(self, name).await
    }

    async fn patch(&self, name: &str, document: &serde_json::Value) -> Result<K, kube::Error> {
        Api::patch(
            self,
            name,
            &PatchParams::default(),
            &Patch::Strategic(document),
        )
        .await
    }
}
