//! Linear-chain CRF training.
//!
//! Sequences are handed to the CRFsuite L-BFGS trainer from `crfs`. The
//! model is written to a temporary directory and read back into memory, so
//! nothing persists on disk.

use crfs::Attribute;
use crfs::train::{Algorithm, Trainer};
use tracing::{debug, info};

use crate::crf::backend_error;
use crate::crf::model::CrfModel;
use crate::error::{PosTagError, Result};
use crate::features::FeatureRecord;

const MODEL_FILE: &str = "model.crfsuite";

/// Hyper-parameters for [`CrfTrainer`].
#[derive(Debug, Clone, PartialEq)]
pub struct CrfConfig {
    /// L1 regularization coefficient.
    pub c1: f64,
    /// L2 regularization coefficient.
    pub c2: f64,
    /// Maximum number of L-BFGS iterations.
    pub max_iterations: usize,
    /// Learn weights for label pairs that never occur next to each other in
    /// the training data.
    pub all_possible_transitions: bool,
    /// Number of iterations to look back for the convergence test.
    pub period: usize,
    /// Stop when the objective improved by less than this fraction over
    /// the last `period` iterations.
    pub delta: f64,
}

impl Default for CrfConfig {
    fn default() -> Self {
        Self {
            c1: 0.01,
            c2: 0.1,
            max_iterations: 100,
            all_possible_transitions: true,
            period: 10,
            delta: 1e-5,
        }
    }
}

impl CrfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_c1(mut self, c1: f64) -> Self {
        self.c1 = c1.max(0.0);
        self
    }

    pub fn with_c2(mut self, c2: f64) -> Self {
        self.c2 = c2.max(0.0);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_all_possible_transitions(mut self, enabled: bool) -> Self {
        self.all_possible_transitions = enabled;
        self
    }

    pub fn with_stopping(mut self, period: usize, delta: f64) -> Self {
        self.period = period;
        self.delta = delta;
        self
    }

    /// CRFsuite parameter names and values.
    fn params(&self) -> [(&'static str, String); 6] {
        [
            ("c1", self.c1.to_string()),
            ("c2", self.c2.to_string()),
            ("max_iterations", self.max_iterations.to_string()),
            ("period", self.period.to_string()),
            ("delta", self.delta.to_string()),
            (
                "feature.possible_transitions",
                u8::from(self.all_possible_transitions).to_string(),
            ),
        ]
    }
}

/// Trains [`CrfModel`]s from feature-record sequences.
#[derive(Debug, Clone, Default)]
pub struct CrfTrainer {
    config: CrfConfig,
}

impl CrfTrainer {
    pub fn new(config: CrfConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrfConfig {
        &self.config
    }

    /// Fit a model on aligned feature and label sequences.
    ///
    /// Labels are listed in order of first appearance. Empty sequences are
    /// skipped.
    pub fn fit(&self, x: &[Vec<FeatureRecord>], y: &[Vec<String>]) -> Result<CrfModel> {
        if x.len() != y.len() {
            let index = x.len().min(y.len());
            return Err(PosTagError::SequenceMismatch {
                index,
                features: x.get(index).map_or(0, Vec::len),
                labels: y.get(index).map_or(0, Vec::len),
            });
        }
        for (index, (xs, ys)) in x.iter().zip(y).enumerate() {
            if xs.len() != ys.len() {
                return Err(PosTagError::SequenceMismatch {
                    index,
                    features: xs.len(),
                    labels: ys.len(),
                });
            }
        }

        let mut trainer = Trainer::new(false);
        trainer.select(Algorithm::LBFGS).map_err(backend_error)?;

        let mut labels: Vec<String> = Vec::new();
        let mut sequences = 0;
        for (xs, ys) in x.iter().zip(y) {
            if xs.is_empty() {
                continue;
            }
            for label in ys {
                if !labels.contains(label) {
                    labels.push(label.clone());
                }
            }
            let xseq: Vec<Vec<Attribute>> = xs.iter().map(FeatureRecord::attributes).collect();
            let yseq: Vec<&str> = ys.iter().map(String::as_str).collect();
            trainer.append(&xseq, &yseq).map_err(backend_error)?;
            sequences += 1;
        }

        if sequences == 0 {
            return Err(PosTagError::EmptyTrainingSet);
        }

        for (name, value) in self.config.params() {
            debug!(name, value = %value, "CRF parameter");
            trainer.set(name, &value).map_err(backend_error)?;
        }

        info!(sequences, labels = labels.len(), "training CRF");

        let dir = tempfile::tempdir().map_err(|e| PosTagError::io(std::env::temp_dir(), e))?;
        let path = dir.path().join(MODEL_FILE);
        let path_str = path
            .to_str()
            .ok_or_else(|| PosTagError::Crf(format!("non UTF-8 model path {}", path.display())))?;
        trainer.train(path_str).map_err(backend_error)?;
        let data = std::fs::read(&path).map_err(|e| PosTagError::io(&path, e))?;

        CrfModel::from_bytes(labels, data)
    }
}
