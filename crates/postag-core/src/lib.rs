//! # Postag Core
//!
//! Part-of-speech tagging toolkit. Reads Universal Dependencies treebanks,
//! extracts per-word features, trains and evaluates linear-chain CRF
//! taggers, and runs transformer token classifiers over raw text.
//!
//! ## Quick Start
//!
//! ```rust
//! use postag_core::crf::{CrfConfig, CrfTrainer};
//! use postag_core::features::{FeatureExtractor, LatinFeatureExtractor};
//! use postag_core::treebank::parse_conllu_str;
//!
//! let treebank = parse_conllu_str(
//!     "1\tThe\tthe\tDET\t_\t_\t2\tdet\t_\t_\n\
//!      2\tdog\tdog\tNOUN\t_\t_\t3\tnsubj\t_\t_\n\
//!      3\truns\trun\tVERB\t_\t_\t0\troot\t_\t_\n",
//! )
//! .unwrap();
//!
//! let extractor = LatinFeatureExtractor::new().unwrap();
//! let x: Vec<_> = treebank.iter().map(|s| extractor.sentence_features(s.words())).collect();
//! let y: Vec<_> = treebank.iter().map(|s| s.tag_labels()).collect();
//!
//! let model = CrfTrainer::new(CrfConfig::default()).fit(&x, &y).unwrap();
//! assert_eq!(model.predict(&x).unwrap(), y);
//! ```
pub mod crf;
pub mod dataset;
pub mod error;
pub mod features;
pub mod language;
pub mod metrics;
pub mod neural;
pub mod report;
pub mod treebank;

// Re-export primary API
pub use crf::{CrfConfig, CrfModel, CrfTrainer};
pub use dataset::{DatasetPreparer, PreparedData, Shuffler};
pub use error::{PosTagError, Result};
pub use features::{
    FeatureExtractor, FeatureRecord, FeatureValue, LatinFeatureExtractor, extractor_for,
};
pub use language::{Language, Script};
pub use metrics::{LabelScore, flat_f1_score, label_scores};
pub use neural::{
    PipelineConfig, TextNormalizer, TokenClassificationPipeline, TokenClassifier, TokenPrediction,
};
pub use report::{ResultRow, ResultsTable};
pub use treebank::{Sentence, Treebank, TreebankSource, UdTreebank, UposTag};
