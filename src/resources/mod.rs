pub mod common;
pub mod webhook;

pub use common::{AdmissionConfig, standard_labels};
