//! Test fixtures for ClusterAdmissionPolicy and policy-server Secret objects

use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kubewarden_controller::crd::{
    ClusterAdmissionPolicy, ClusterAdmissionPolicySpec, FailurePolicy, RuleWithOperations,
};
use kubewarden_controller::resources::common::POLICY_SERVER_CA_SECRET_KEY;
use std::collections::BTreeMap;

/// Create a policy intercepting pod creation, failing closed
pub fn test_policy(name: &str) -> ClusterAdmissionPolicy {
    ClusterAdmissionPolicy::new(
        name,
        ClusterAdmissionPolicySpec {
            module: "registry://ghcr.io/kubewarden/policies/pod-privileged:v0.1.9".to_string(),
            settings: None,
            mutating: false,
            rules: vec![RuleWithOperations {
                operations: vec!["CREATE".to_string()],
                api_groups: vec!["".to_string()],
                api_versions: vec!["v1".to_string()],
                resources: vec!["pods".to_string()],
                scope: None,
            }],
            failure_policy: Some(FailurePolicy::Fail),
            match_policy: None,
            namespace_selector: None,
            object_selector: None,
            side_effects: None,
            timeout_seconds: None,
        },
    )
}

/// Create a policy-server Secret carrying the given CA bundle
pub fn test_secret(ca_bundle: &[u8]) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some("policy-server-certs".to_string()),
            namespace: Some("kubewarden".to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            POLICY_SERVER_CA_SECRET_KEY.to_string(),
            ByteString(ca_bundle.to_vec()),
        )])),
        ..Default::default()
    }
}
