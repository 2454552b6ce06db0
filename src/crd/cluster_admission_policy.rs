use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ClusterAdmissionPolicy is the Schema for the clusteradmissionpolicies API
///
/// A policy describes which API requests must be evaluated by the policy
/// server, and how the resulting admission webhook has to behave when the
/// evaluation cannot be performed.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "policies.kubewarden.io",
    version = "v1alpha2",
    kind = "ClusterAdmissionPolicy",
    plural = "clusteradmissionpolicies",
    shortname = "cap"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAdmissionPolicySpec {
    /// Location of the WebAssembly module that evaluates this policy
    pub module: String,

    /// Free-form settings handed to the policy at evaluation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,

    /// Whether the policy is allowed to mutate incoming requests.
    /// Mutating policies are registered through a mutating webhook,
    /// everything else through a validating one.
    #[serde(default)]
    pub mutating: bool,

    /// API requests the webhook intercepts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleWithOperations>,

    /// How the API server behaves when the policy server cannot be reached
    /// or returns an unrecognized response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<FailurePolicy>,

    /// How the rules list is matched against incoming requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_policy: Option<MatchPolicy>,

    /// Restricts the webhook to requests originating from matching namespaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,

    /// Restricts the webhook to requests whose object matches the selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_selector: Option<LabelSelector>,

    /// Side effects the policy evaluation may have on the cluster.
    /// Defaults to None when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<SideEffectClass>,

    /// Seconds the API server waits for the webhook to respond
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,
}

/// A single rule describing which operations on which resources are
/// intercepted by the webhook
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleWithOperations {
    /// Operations the rule applies to (e.g. "CREATE", "UPDATE", or "*")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<String>,

    /// API groups the resources belong to ("" for the core group)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_groups: Vec<String>,

    /// API versions the resources belong to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_versions: Vec<String>,

    /// Resource names, optionally with subresources (e.g. "pods", "pods/status")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    /// Scope the rule applies to: "Cluster", "Namespaced", or "*"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Label selector over namespaces or objects
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// Exact-match label requirements, ANDed together
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,

    /// Expression requirements, ANDed together with matchLabels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

/// A single label selector expression
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelectorRequirement {
    /// Label key the requirement applies to
    pub key: String,

    /// Relationship to the values: "In", "NotIn", "Exists", "DoesNotExist"
    pub operator: String,

    /// Values for "In" and "NotIn" operators, empty otherwise
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Behavior of the API server when the webhook call fails
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Reject the request
    Fail,
    /// Let the request through
    Ignore,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Fail => write!(f, "Fail"),
            FailurePolicy::Ignore => write!(f, "Ignore"),
        }
    }
}

/// How rules are matched against the incoming request's group/version/resource
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Only the exact group/version/resource listed in the rule matches
    Exact,
    /// Equivalent resources served through other API groups also match
    Equivalent,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPolicy::Exact => write!(f, "Exact"),
            MatchPolicy::Equivalent => write!(f, "Equivalent"),
        }
    }
}

/// Side effects a policy evaluation may have on the cluster
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, JsonSchema, PartialEq, Eq)]
pub enum SideEffectClass {
    /// Evaluation never has side effects
    #[default]
    None,
    /// Evaluation has no side effects for dry-run requests
    NoneOnDryRun,
    /// Evaluation may have side effects
    Some,
    /// Side effects are unknown
    Unknown,
}

impl std::fmt::Display for SideEffectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SideEffectClass::None => write!(f, "None"),
            SideEffectClass::NoneOnDryRun => write!(f, "NoneOnDryRun"),
            SideEffectClass::Some => write!(f, "Some"),
            SideEffectClass::Unknown => write!(f, "Unknown"),
        }
    }
}
