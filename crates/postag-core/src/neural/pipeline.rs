//! # Token Classification Pipeline
//!
//! Tokenizes raw text, runs a [`TokenScorer`] over windows that fit the
//! model's position table and turns the logits into one record per
//! sub-word token.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer as HfTokenizer;
use tracing::{debug, info};

use crate::error::{PosTagError, Result};
use crate::neural::model::{load_tokenizer, TokenClassifier, TokenScorer};

/// Longest window of content tokens, special tokens excluded.
pub const DEFAULT_MAX_WINDOW: usize = 510;

/// One tagged sub-word token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPrediction {
    /// Predicted label.
    pub entity: String,
    /// Softmax probability of the predicted label.
    pub score: f32,
    /// 1-based position of the token in the tokenized text.
    pub index: usize,
    /// The token as produced by the tokenizer.
    pub word: String,
    /// Char offset where the token starts.
    pub start: usize,
    /// Char offset where the token ends.
    pub end: usize,
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub cls_token: String,
    pub sep_token: String,
    /// Predictions with one of these labels are dropped.
    pub ignore_labels: Vec<String>,
    pub max_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cls_token: "[CLS]".into(),
            sep_token: "[SEP]".into(),
            ignore_labels: vec!["O".into()],
            max_window: DEFAULT_MAX_WINDOW,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// RoBERTa-style `<s>` / `</s>` special tokens.
    pub fn roberta() -> Self {
        Self::default().with_special_tokens("<s>", "</s>")
    }

    pub fn with_special_tokens(mut self, cls: impl Into<String>, sep: impl Into<String>) -> Self {
        self.cls_token = cls.into();
        self.sep_token = sep.into();
        self
    }

    pub fn with_ignore_labels(mut self, labels: Vec<String>) -> Self {
        self.ignore_labels = labels;
        self
    }

    pub fn with_max_window(mut self, max_window: usize) -> Self {
        self.max_window = max_window.max(1);
        self
    }
}

/// Tags raw text with a token-classification model.
pub struct TokenClassificationPipeline<S = TokenClassifier> {
    tokenizer: HfTokenizer,
    scorer: S,
    config: PipelineConfig,
}

impl TokenClassificationPipeline<TokenClassifier> {
    /// Load tokenizer and model from a local model directory.
    pub fn from_dir(dir: impl AsRef<Path>, config: PipelineConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let tokenizer = load_tokenizer(dir)?;
        let scorer = TokenClassifier::load(dir)?;
        Ok(Self::new(tokenizer, scorer, config))
    }
}

impl<S: TokenScorer> TokenClassificationPipeline<S> {
    pub fn new(tokenizer: HfTokenizer, scorer: S, config: PipelineConfig) -> Self {
        Self {
            tokenizer,
            scorer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn special_id(&self, token: &str) -> Result<u32> {
        self.tokenizer.token_to_id(token).ok_or_else(|| {
            PosTagError::Tokenizer(format!("special token {token:?} is not in the vocabulary"))
        })
    }

    fn window_len(&self) -> usize {
        self.config
            .max_window
            .min(self.scorer.max_positions().saturating_sub(2))
            .max(1)
    }

    /// Tag `text`, returning predictions in token order.
    pub fn tag(&self, text: &str) -> Result<Vec<TokenPrediction>> {
        let encoding = self
            .tokenizer
            .encode_char_offsets(text, false)
            .map_err(|e| PosTagError::Tokenizer(e.to_string()))?;
        let ids = encoding.get_ids();
        let tokens = encoding.get_tokens();
        let offsets = encoding.get_offsets();

        let cls = self.special_id(&self.config.cls_token)?;
        let sep = self.special_id(&self.config.sep_token)?;
        let labels = self.scorer.labels();

        let mut predictions = Vec::new();
        let windows = window_ranges(ids.len(), self.window_len());
        info!(tokens = ids.len(), windows = windows.len(), "tagging text");

        for range in windows {
            let mut input = Vec::with_capacity(range.len() + 2);
            input.push(cls);
            input.extend_from_slice(&ids[range.clone()]);
            input.push(sep);

            let logits = self.scorer.score(&input)?;
            if logits.len() != input.len() {
                return Err(PosTagError::Decode(format!(
                    "model returned {} rows for {} tokens",
                    logits.len(),
                    input.len()
                )));
            }
            debug!(start = range.start, end = range.end, "scored window");

            for (pos, row) in logits[1..logits.len() - 1].iter().enumerate() {
                let i = range.start + pos;
                let Some((best, score)) = best_label(&softmax(row)) else {
                    continue;
                };
                let entity = labels.get(best).ok_or_else(|| {
                    PosTagError::Decode(format!("label index {best} out of range"))
                })?;
                if self.config.ignore_labels.contains(entity) {
                    continue;
                }
                predictions.push(TokenPrediction {
                    entity: entity.clone(),
                    score,
                    index: i + 1,
                    word: tokens[i].clone(),
                    start: offsets[i].0,
                    end: offsets[i].1,
                });
            }
        }

        Ok(predictions)
    }
}

/// Split `len` tokens into consecutive windows of at most `window` tokens.
pub fn window_ranges(len: usize, window: usize) -> Vec<Range<usize>> {
    let window = window.max(1);
    (0..len)
        .step_by(window)
        .map(|start| start..(start + window).min(len))
        .collect()
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest probability; the first one wins ties.
pub fn best_label(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
}
