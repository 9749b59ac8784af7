//! # Postag Trainer
//!
//! End-to-end CRF flows over Universal Dependencies treebanks: load,
//! shuffle and split, extract features, train, score with weighted F1 and
//! report.

pub mod experiment;

pub use experiment::{ExperimentConfig, run_evaluation, run_experiment};
