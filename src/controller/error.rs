//! Error types for webhook registration reconciliation
//!
//! Every terminal failure carries a stable, operation-identifying context
//! while keeping the underlying cause reachable through `source()` for
//! programmatic inspection.

use thiserror::Error;

use crate::controller::admission::WebhookKind;

/// Error type for webhook registration reconciliation
#[derive(Error, Debug)]
pub enum Error {
    /// The remote store rejected a create, get, or patch
    #[error("cannot reconcile {kind} webhook registration: {source}")]
    Reconcile {
        kind: WebhookKind,
        source: kube::Error,
    },

    /// The merge document could not be built from the desired registration
    #[error("cannot serialize webhook registration merge document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if the registration disappeared between the create conflict
    /// and the subsequent fetch
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Reconcile { source: kube::Error::Api(e), .. } if e.code == 404
        )
    }

    /// Check if this error should be retried by the caller's control loop.
    ///
    /// Retry and backoff are entirely caller-owned; this only classifies.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Reconcile { source, .. } => match source {
                // Conflicts and rate limiting resolve on a later attempt,
                // as do server-side failures
                kube::Error::Api(e) => e.code == 409 || e.code == 429 || e.code >= 500,
                // Network and transport errors are worth retrying
                _ => true,
            },
            Error::Serialization(_) => false,
        }
    }
}

/// Check if a store failure means the registration already exists
pub fn already_exists(error: &kube::Error) -> bool {
    matches!(error, kube::Error::Api(e) if e.code == 409)
}

/// Result type alias for reconciliation operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
