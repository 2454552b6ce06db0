//! Common constants and helpers for webhook registration generation
//!
//! This module provides the process-wide configuration and the shared
//! constants used by the webhook configuration generators, so that both
//! hook kinds stay consistent.

use std::collections::BTreeMap;

/// Namespace the kubewarden stack is deployed in, unless overridden
pub const DEFAULT_DEPLOYMENTS_NAMESPACE: &str = "kubewarden";

/// Name of the Service fronting the policy server
pub const POLICY_SERVER_SERVICE_NAME: &str = "policy-server";

/// HTTPS port the policy-server Service listens on
pub const POLICY_SERVER_PORT: i32 = 8443;

/// Key of the policy-server Secret holding the CA certificate bundle
pub const POLICY_SERVER_CA_SECRET_KEY: &str = "policy-server-ca";

/// Path prefix under which the policy server evaluates admission reviews.
/// The policy server answers both validating and mutating reviews on the
/// same endpoint.
pub const ADMISSION_PATH_PREFIX: &str = "/validate";

/// Suffix appended to a policy name to form the webhook entry name
pub const WEBHOOK_NAME_SUFFIX: &str = "kubewarden.admission";

/// Admission review version the policy server understands
pub const ADMISSION_REVIEW_VERSION: &str = "v1";

/// Read-only configuration for webhook registration: where the policy
/// server can be reached from the API server's point of view.
///
/// Injected at construction instead of read from ambient globals so tests
/// and multi-tenant deployments can point at different namespaces.
#[derive(Clone, Debug)]
pub struct AdmissionConfig {
    /// Namespace the policy-server Service lives in
    pub deployments_namespace: String,
    /// Name of the policy-server Service
    pub service_name: String,
    /// Port of the policy-server Service
    pub service_port: i32,
}

impl AdmissionConfig {
    /// Configuration for a policy server deployed in the given namespace,
    /// using the standard service name and port
    pub fn new(deployments_namespace: impl Into<String>) -> Self {
        Self {
            deployments_namespace: deployments_namespace.into(),
            service_name: POLICY_SERVER_SERVICE_NAME.to_string(),
            service_port: POLICY_SERVER_PORT,
        }
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENTS_NAMESPACE)
    }
}

/// Marker labels applied to every webhook registration this controller owns
pub fn standard_labels() -> BTreeMap<String, String> {
    BTreeMap::from([("kubewarden".to_string(), "true".to_string())])
}
