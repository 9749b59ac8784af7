//! # Conditional Random Fields
//!
//! Linear-chain CRF over [`FeatureRecord`](crate::features::FeatureRecord)
//! sequences, backed by `crfs` (a port of CRFsuite). [`CrfTrainer`] fits a
//! [`CrfModel`] with L-BFGS, which then tags new sentences.

pub mod model;
pub mod trainer;

pub use model::CrfModel;
pub use trainer::{CrfConfig, CrfTrainer};

use crate::error::PosTagError;

fn backend_error(err: impl std::fmt::Display) -> PosTagError {
    PosTagError::Crf(err.to_string())
}
