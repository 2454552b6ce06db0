//! In-memory store simulating the admission registration API.
//!
//! Instead of duplicating production logic, the mock holds the stored
//! registration as a JSON document, answers `create` with a 409 once an
//! object exists, and applies patches as a recursive object merge
//! (objects merge, arrays and scalars replace) — the subset of strategic
//! merge semantics these registrations exercise. Every call is recorded
//! so tests can assert on the exact store traffic.

use std::marker::PhantomData;
use std::sync::Mutex;

use async_trait::async_trait;
use kube::core::ErrorResponse;
use kubewarden_controller::WebhookConfigurationStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Build the kube API error a real cluster would return
pub fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} ({})", reason, code),
        reason: reason.to_string(),
        code,
    })
}

#[derive(Default)]
struct MockState {
    stored: Option<Value>,
    create_calls: Vec<Value>,
    get_calls: Vec<String>,
    patch_calls: Vec<(String, Value)>,
    fail_create: Option<u16>,
    fail_get: Option<u16>,
    fail_patch: Option<u16>,
}

/// Recording store over a single registration of type `K`
pub struct MockStore<K> {
    state: Mutex<MockState>,
    _kind: PhantomData<K>,
}

impl<K> MockStore<K> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            _kind: PhantomData,
        }
    }

    /// Pre-populate the store with an existing registration
    pub fn seed(&self, existing: Value) {
        self.state.lock().unwrap().stored = Some(existing);
    }

    /// Make the next `create` fail with the given API status code
    pub fn fail_create_with(&self, code: u16) {
        self.state.lock().unwrap().fail_create = Some(code);
    }

    /// Make the next `get` fail with the given API status code
    pub fn fail_get_with(&self, code: u16) {
        self.state.lock().unwrap().fail_get = Some(code);
    }

    /// Make the next `patch` fail with the given API status code
    pub fn fail_patch_with(&self, code: u16) {
        self.state.lock().unwrap().fail_patch = Some(code);
    }

    /// The registration currently held by the store
    pub fn stored(&self) -> Option<Value> {
        self.state.lock().unwrap().stored.clone()
    }

    pub fn create_calls(&self) -> Vec<Value> {
        self.state.lock().unwrap().create_calls.clone()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().get_calls.clone()
    }

    pub fn patch_calls(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().patch_calls.clone()
    }
}

#[async_trait]
impl<K> WebhookConfigurationStore<K> for MockStore<K>
where
    K: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    async fn create(&self, desired: &K) -> Result<K, kube::Error> {
        let mut state = self.state.lock().unwrap();
        state.create_calls.push(serde_json::to_value(desired).unwrap());
        if let Some(code) = state.fail_create {
            return Err(api_error(code, "InternalError"));
        }
        if state.stored.is_some() {
            return Err(api_error(409, "AlreadyExists"));
        }
        state.stored = Some(serde_json::to_value(desired).unwrap());
        Ok(desired.clone())
    }

    async fn get(&self, name: &str) -> Result<K, kube::Error> {
        let mut state = self.state.lock().unwrap();
        state.get_calls.push(name.to_string());
        if let Some(code) = state.fail_get {
            return Err(api_error(code, "NotFound"));
        }
        match &state.stored {
            Some(existing) => Ok(serde_json::from_value(existing.clone()).unwrap()),
            None => Err(api_error(404, "NotFound")),
        }
    }

    async fn patch(&self, name: &str, document: &Value) -> Result<K, kube::Error> {
        let mut state = self.state.lock().unwrap();
        state.patch_calls.push((name.to_string(), document.clone()));
        if let Some(code) = state.fail_patch {
            return Err(api_error(code, "ServiceUnavailable"));
        }
        match state.stored.as_mut() {
            Some(existing) => {
                merge(existing, document);
                Ok(serde_json::from_value(existing.clone()).unwrap())
            }
            None => Err(api_error(404, "NotFound")),
        }
    }
}

/// Recursive object merge: objects merge key-wise, everything else replaces
fn merge(existing: &mut Value, document: &Value) {
    match (existing, document) {
        (Value::Object(existing_map), Value::Object(document_map)) => {
            for (key, value) in document_map {
                let merge_into = existing_map
                    .get(key)
                    .map(|slot| slot.is_object() && value.is_object())
                    .unwrap_or(false);
                if merge_into {
                    merge(existing_map.get_mut(key).unwrap(), value);
                } else {
                    existing_map.insert(key.clone(), value.clone());
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
