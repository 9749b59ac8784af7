//! # Transformer Tagging
//!
//! Local token-classification checkpoints run through candle, plus the
//! text clean-up applied before tagging.

pub mod model;
pub mod normalize;
pub mod pipeline;

pub use model::{TokenClassifier, TokenScorer};
pub use normalize::TextNormalizer;
pub use pipeline::{PipelineConfig, TokenClassificationPipeline, TokenPrediction};
