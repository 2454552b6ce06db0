pub mod admission;
pub mod error;
pub mod store;

pub use admission::{WebhookKind, WebhookReconciler, create_or_patch};
pub use error::{Error, Result, already_exists};
pub use store::WebhookConfigurationStore;
