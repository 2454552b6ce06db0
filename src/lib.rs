//! kubewarden-controller library crate
//!
//! Keeps the cluster's admission webhook registrations synchronized with
//! `ClusterAdmissionPolicy` resources. For every policy, the desired
//! `MutatingWebhookConfiguration` or `ValidatingWebhookConfiguration` is
//! derived from the policy spec and the policy-server CA Secret, then
//! converged through an idempotent create-or-patch cycle.
//!
//! Retry, backoff, and per-policy serialization are owned by the calling
//! control loop; this crate reports classified errors and performs no
//! internal retries.

pub mod controller;
pub mod crd;
pub mod resources;

pub use controller::{
    Error, Result, WebhookConfigurationStore, WebhookKind, WebhookReconciler, create_or_patch,
};
pub use crd::ClusterAdmissionPolicy;
pub use resources::AdmissionConfig;
