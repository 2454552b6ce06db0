mod cluster_admission_policy;

pub use cluster_admission_policy::*;
