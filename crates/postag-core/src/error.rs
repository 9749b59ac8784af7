use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing data, training or tagging.
#[derive(Debug, Error)]
pub enum PosTagError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CoNLL-U reader rejected the input.
    #[error("malformed CoNLL-U: {0}")]
    MalformedConllu(String),

    /// The UPOS column holds something outside the Universal Dependencies tag set.
    #[error("unknown UPOS tag {tag:?} in sentence {sentence}")]
    UnknownUpos {
        /// 1-based sentence number in the source file.
        sentence: usize,
        /// The offending tag.
        tag: String,
    },

    /// A sentence has a different number of words and tags.
    #[error("sentence has {words} words but {tags} tags")]
    LengthMismatch { words: usize, tags: usize },

    /// No treebank or feature extractor exists for the requested language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The train/test fraction is not a finite number in `[0, 1]`.
    #[error("training fraction must lie in [0, 1], got {0}")]
    InvalidFraction(f64),

    /// CRF training was called without any sequences.
    #[error("cannot train a CRF on an empty training set")]
    EmptyTrainingSet,

    /// Feature and label sequences are not aligned.
    #[error("sequence {index}: {features} feature records but {labels} labels")]
    SequenceMismatch {
        index: usize,
        features: usize,
        labels: usize,
    },

    /// Gold and predicted label sequences are not aligned.
    #[error("prediction {index}: expected {expected} labels, got {found}")]
    PredictionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Model output does not line up with its input.
    #[error("decoding error: {0}")]
    Decode(String),

    /// The CRF backend failed to train, load or tag.
    #[error("CRF error: {0}")]
    Crf(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The transformer model or its companion files could not be loaded.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The tokenizer failed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Candle ML framework error.
    #[error("ML inference error: {0}")]
    CandleError(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PosTagError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PosTagError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<candle_core::Error> for PosTagError {
    fn from(err: candle_core::Error) -> Self {
        PosTagError::CandleError(err.to_string())
    }
}

/// Result type alias for postag operations.
pub type Result<T> = std::result::Result<T, PosTagError>;
