//! Create-or-patch convergence for admission webhook registrations
//!
//! Drives the `MutatingWebhookConfiguration` / `ValidatingWebhookConfiguration`
//! a policy asks for to its desired state: attempt creation, and when
//! another actor got there first, fall back to fetch-then-patch with a
//! strategic merge of only the fields this controller owns.

use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client, Resource};
use serde::Serialize;
use tracing::{debug, info};

use crate::controller::error::{Error, Result, already_exists};
use crate::controller::store::WebhookConfigurationStore;
use crate::crd::ClusterAdmissionPolicy;
use crate::resources::common::AdmissionConfig;
use crate::resources::webhook::{
    generate_mutating_webhook_configuration, generate_validating_webhook_configuration,
};

/// Kind of admission hook a registration belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WebhookKind {
    /// Registered through a `MutatingWebhookConfiguration`
    Mutating,
    /// Registered through a `ValidatingWebhookConfiguration`
    Validating,
}

impl WebhookKind {
    /// The hook kind a policy registers through, derived from its spec
    pub fn for_policy(policy: &ClusterAdmissionPolicy) -> Self {
        if policy.spec.mutating {
            WebhookKind::Mutating
        } else {
            WebhookKind::Validating
        }
    }
}

impl std::fmt::Display for WebhookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookKind::Mutating => write!(f, "mutating"),
            WebhookKind::Validating => write!(f, "validating"),
        }
    }
}

/// Keeps admission webhook registrations synchronized with their policies.
///
/// Holds only a client and read-only configuration; the desired
/// registration is recomputed from the policy and the policy-server CA
/// Secret on every call. Calls for distinct policy names are safe to run
/// concurrently. Concurrent calls for the same name race between fetch
/// and patch, so callers are expected to serialize reconciliation per
/// policy name.
pub struct WebhookReconciler {
    client: Client,
    config: AdmissionConfig,
}

impl WebhookReconciler {
    /// Create a reconciler targeting the policy server described by `config`
    pub fn new(client: Client, config: AdmissionConfig) -> Self {
        Self { client, config }
    }

    /// Converge the registration of the given kind for a policy.
    ///
    /// Repeated calls with an unchanged policy and Secret converge to,
    /// and remain at, the desired state.
    pub async fn reconcile(
        &self,
        kind: WebhookKind,
        policy: &ClusterAdmissionPolicy,
        ca_secret: &Secret,
    ) -> Result<()> {
        match kind {
            WebhookKind::Mutating => {
                let desired =
                    generate_mutating_webhook_configuration(&self.config, policy, ca_secret);
                let store: Api<MutatingWebhookConfiguration> = Api::all(self.client.clone());
                create_or_patch(&store, kind, &desired).await
            }
            WebhookKind::Validating => {
                let desired =
                    generate_validating_webhook_configuration(&self.config, policy, ca_secret);
                let store: Api<ValidatingWebhookConfiguration> = Api::all(self.client.clone());
                create_or_patch(&store, kind, &desired).await
            }
        }
    }

    /// Converge the registration a policy asks for through its spec
    pub async fn reconcile_policy(
        &self,
        policy: &ClusterAdmissionPolicy,
        ca_secret: &Secret,
    ) -> Result<()> {
        self.reconcile(WebhookKind::for_policy(policy), policy, ca_secret)
            .await
    }
}

/// Drive a single registration to its desired state.
///
/// Creation settles the "first writer wins" race inside the store. On a
/// 409 conflict the registration is fetched and patched with a strategic
/// merge document built from the desired state, so remote fields outside
/// the document survive. Between fetch and patch there is a window where
/// a concurrent writer to the same owned fields loses; callers serialize
/// per registration name to avoid it.
pub async fn create_or_patch<K, S>(store: &S, kind: WebhookKind, desired: &K) -> Result<()>
where
    K: Resource + Serialize + Sync,
    S: WebhookConfigurationStore<K>,
{
    let name = desired.meta().name.clone().unwrap_or_default();
    debug!(%kind, name = %name, "reconciling webhook registration");

    match store.create(desired).await {
        Ok(_) => {
            info!(%kind, name = %name, "created webhook registration");
            Ok(())
        }
        Err(error) if already_exists(&error) => {
            debug!(%kind, name = %name, "registration exists, merging desired state");
            let existing = store
                .get(&name)
                .await
                .map_err(|source| Error::Reconcile { kind, source })?;
            let document = serde_json::to_value(desired)?;
            let target = existing.meta().name.as_deref().unwrap_or(&name);
            store
                .patch(target, &document)
                .await
                .map_err(|source| Error::Reconcile { kind, source })?;
            debug!(%kind, name = %name, "patched webhook registration");
            Ok(())
        }
        Err(source) => Err(Error::Reconcile { kind, source }),
    }
}
