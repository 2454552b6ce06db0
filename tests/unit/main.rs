//! Unit tests for webhook registration reconciliation
//!
//! These tests drive the create-or-patch engine through the public API
//! against an in-memory store, without requiring a Kubernetes cluster.

mod fixtures;
mod mock_store;
