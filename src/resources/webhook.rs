//! Webhook registration generation for admission policies
//!
//! Generates the `ValidatingWebhookConfiguration` / `MutatingWebhookConfiguration`
//! objects that tell the API server to send admission reviews for a
//! `ClusterAdmissionPolicy` to the policy server.
//!
//! Generation is pure: the desired registration is recomputed from the
//! current policy and policy-server CA Secret on every reconciliation, and
//! identical inputs always produce a structurally identical object. Both
//! hook kinds share a single field-assembly path so they cannot drift.

use k8s_openapi::ByteString;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhook, MutatingWebhookConfiguration, RuleWithOperations, ServiceReference,
    ValidatingWebhook, ValidatingWebhookConfiguration, WebhookClientConfig,
};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    LabelSelector, LabelSelectorRequirement, ObjectMeta,
};
use kube::ResourceExt;

use crate::crd::{self, ClusterAdmissionPolicy, SideEffectClass};
use crate::resources::common::{
    ADMISSION_PATH_PREFIX, ADMISSION_REVIEW_VERSION, AdmissionConfig, POLICY_SERVER_CA_SECRET_KEY,
    WEBHOOK_NAME_SUFFIX, standard_labels,
};

/// Generate the validating webhook registration for a policy
pub fn generate_validating_webhook_configuration(
    config: &AdmissionConfig,
    policy: &ClusterAdmissionPolicy,
    ca_secret: &Secret,
) -> ValidatingWebhookConfiguration {
    let entry = webhook_entry(config, policy, ca_secret);

    ValidatingWebhookConfiguration {
        metadata: registration_metadata(policy),
        webhooks: Some(vec![ValidatingWebhook {
            name: entry.name,
            client_config: entry.client_config,
            rules: entry.rules,
            failure_policy: entry.failure_policy,
            match_policy: entry.match_policy,
            namespace_selector: entry.namespace_selector,
            object_selector: entry.object_selector,
            side_effects: entry.side_effects,
            timeout_seconds: entry.timeout_seconds,
            admission_review_versions: entry.admission_review_versions,
            ..Default::default()
        }]),
    }
}

/// Generate the mutating webhook registration for a policy
pub fn generate_mutating_webhook_configuration(
    config: &AdmissionConfig,
    policy: &ClusterAdmissionPolicy,
    ca_secret: &Secret,
) -> MutatingWebhookConfiguration {
    let entry = webhook_entry(config, policy, ca_secret);

    MutatingWebhookConfiguration {
        metadata: registration_metadata(policy),
        webhooks: Some(vec![MutatingWebhook {
            name: entry.name,
            client_config: entry.client_config,
            rules: entry.rules,
            failure_policy: entry.failure_policy,
            match_policy: entry.match_policy,
            namespace_selector: entry.namespace_selector,
            object_selector: entry.object_selector,
            side_effects: entry.side_effects,
            timeout_seconds: entry.timeout_seconds,
            admission_review_versions: entry.admission_review_versions,
            ..Default::default()
        }]),
    }
}

/// Registration metadata: the registration is named after the policy
/// (1:1 mapping) and carries the operator's marker label
fn registration_metadata(policy: &ClusterAdmissionPolicy) -> ObjectMeta {
    ObjectMeta {
        name: Some(policy.name_any()),
        labels: Some(standard_labels()),
        ..Default::default()
    }
}

/// Fields shared by both hook kinds for a single policy
struct WebhookEntry {
    name: String,
    client_config: WebhookClientConfig,
    rules: Option<Vec<RuleWithOperations>>,
    failure_policy: Option<String>,
    match_policy: Option<String>,
    namespace_selector: Option<LabelSelector>,
    object_selector: Option<LabelSelector>,
    side_effects: String,
    timeout_seconds: Option<i32>,
    admission_review_versions: Vec<String>,
}

/// Assemble the single webhook entry for a policy.
///
/// The policy server evaluates every policy under
/// `/validate/<policy name>`, for mutating and validating hooks alike.
/// A missing CA key in the Secret yields an absent bundle, not an error;
/// the API server will then reject calls until the bundle is rotated in.
fn webhook_entry(
    config: &AdmissionConfig,
    policy: &ClusterAdmissionPolicy,
    ca_secret: &Secret,
) -> WebhookEntry {
    let policy_name = policy.name_any();

    let service = ServiceReference {
        namespace: config.deployments_namespace.clone(),
        name: config.service_name.clone(),
        path: Some(format!("{}/{}", ADMISSION_PATH_PREFIX, policy_name)),
        port: Some(config.service_port),
    };

    let side_effects = policy
        .spec
        .side_effects
        .unwrap_or(SideEffectClass::None)
        .to_string();

    WebhookEntry {
        name: format!("{}.{}", policy_name, WEBHOOK_NAME_SUFFIX),
        client_config: WebhookClientConfig {
            service: Some(service),
            ca_bundle: ca_bundle(ca_secret),
            url: None,
        },
        rules: some_if_any(&policy.spec.rules).map(|rules| rules.iter().map(to_rule).collect()),
        failure_policy: policy.spec.failure_policy.map(|p| p.to_string()),
        match_policy: policy.spec.match_policy.map(|p| p.to_string()),
        namespace_selector: policy.spec.namespace_selector.as_ref().map(to_label_selector),
        object_selector: policy.spec.object_selector.as_ref().map(to_label_selector),
        side_effects,
        timeout_seconds: policy.spec.timeout_seconds,
        admission_review_versions: vec![ADMISSION_REVIEW_VERSION.to_string()],
    }
}

/// CA bundle from the policy-server Secret, absent when the key is missing
fn ca_bundle(ca_secret: &Secret) -> Option<ByteString> {
    ca_secret
        .data
        .as_ref()
        .and_then(|data| data.get(POLICY_SERVER_CA_SECRET_KEY))
        .cloned()
}

fn to_rule(rule: &crd::RuleWithOperations) -> RuleWithOperations {
    RuleWithOperations {
        operations: some_if_any(&rule.operations).map(|v| v.to_vec()),
        api_groups: some_if_any(&rule.api_groups).map(|v| v.to_vec()),
        api_versions: some_if_any(&rule.api_versions).map(|v| v.to_vec()),
        resources: some_if_any(&rule.resources).map(|v| v.to_vec()),
        scope: rule.scope.clone(),
    }
}

fn to_label_selector(selector: &crd::LabelSelector) -> LabelSelector {
    let match_labels = if selector.match_labels.is_empty() {
        None
    } else {
        Some(selector.match_labels.clone())
    };

    let match_expressions = some_if_any(&selector.match_expressions).map(|requirements| {
        requirements
            .iter()
            .map(|requirement| LabelSelectorRequirement {
                key: requirement.key.clone(),
                operator: requirement.operator.clone(),
                values: some_if_any(&requirement.values).map(|v| v.to_vec()),
            })
            .collect()
    });

    LabelSelector {
        match_labels,
        match_expressions,
    }
}

/// The CRD types use empty collections where the admission registration
/// API uses absent ones
fn some_if_any<T>(values: &[T]) -> Option<&[T]> {
    if values.is_empty() { None } else { Some(values) }
}
