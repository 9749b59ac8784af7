//! # Transformer Token Classifier
//!
//! BERT or RoBERTa encoder with a linear `classifier` head, as exported by
//! token-classification fine-tuning. `model_type` in `config.json` picks
//! the encoder: RoBERTa variants number positions after the padding index,
//! BERT from zero.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::xlm_roberta::{Config as RobertaConfig, XLMRobertaModel};
use serde::Deserialize;
use tokenizers::Tokenizer as HfTokenizer;
use tracing::info;

use crate::error::{PosTagError, Result};

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Produces per-token label logits for a sequence of token ids.
pub trait TokenScorer {
    /// Label names, indexed like the logit columns.
    fn labels(&self) -> &[String];

    /// Longest input (special tokens included) the model accepts.
    fn max_positions(&self) -> usize;

    /// Logits of shape `[input_ids.len()][labels().len()]`.
    fn score(&self, input_ids: &[u32]) -> Result<Vec<Vec<f32>>>;
}

/// The parts of `config.json` the head needs besides the encoder config.
#[derive(Debug, Deserialize)]
struct HeadConfig {
    hidden_size: usize,
    max_position_embeddings: usize,
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    pad_token_id: usize,
    id2label: HashMap<String, String>,
}

/// Encoder family of a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Architecture {
    Bert,
    Roberta,
}

impl HeadConfig {
    fn architecture(&self) -> Architecture {
        match self.model_type.as_deref() {
            Some("roberta") | Some("xlm-roberta") | Some("camembert") => Architecture::Roberta,
            _ => Architecture::Bert,
        }
    }

    /// Positions usable by tokens. RoBERTa reserves `pad_token_id + 1`
    /// leading slots of its position table.
    fn usable_positions(&self) -> usize {
        match self.architecture() {
            Architecture::Roberta => self
                .max_position_embeddings
                .saturating_sub(self.pad_token_id + 1),
            Architecture::Bert => self.max_position_embeddings,
        }
    }

    fn labels(&self) -> Result<Vec<String>> {
        let mut labels = vec![None; self.id2label.len()];
        for (id, label) in &self.id2label {
            let index: usize = id
                .parse()
                .map_err(|_| PosTagError::ModelLoad(format!("invalid id2label key {id:?}")))?;
            let slot = labels.get_mut(index).ok_or_else(|| {
                PosTagError::ModelLoad(format!("id2label key {index} out of range"))
            })?;
            *slot = Some(label.clone());
        }
        labels
            .into_iter()
            .enumerate()
            .map(|(i, l)| l.ok_or_else(|| PosTagError::ModelLoad(format!("id2label misses {i}"))))
            .collect()
    }
}

enum Encoder {
    Bert(BertModel),
    Roberta(XLMRobertaModel),
}

impl Encoder {
    fn load(architecture: Architecture, config: &str, vb: VarBuilder) -> Result<Self> {
        let parse_error = |e: serde_json::Error| {
            PosTagError::ModelLoad(format!("Failed to parse config: {}", e))
        };
        match architecture {
            Architecture::Bert => {
                let config: BertConfig = serde_json::from_str(config).map_err(parse_error)?;
                Ok(Encoder::Bert(BertModel::load(vb, &config)?))
            }
            Architecture::Roberta => {
                let config: RobertaConfig = serde_json::from_str(config).map_err(parse_error)?;
                Ok(Encoder::Roberta(XLMRobertaModel::new(&config, vb.pp("roberta"))?))
            }
        }
    }

    /// Hidden states for a `[1, seq_len]` batch without padding.
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let token_type_ids = input.zeros_like()?;
        let attention_mask = input.ones_like()?;
        let hidden = match self {
            Encoder::Bert(model) => model.forward(input, &token_type_ids, Some(&attention_mask))?,
            Encoder::Roberta(model) => {
                model.forward(input, &attention_mask, &token_type_ids, None, None, None)?
            }
        };
        Ok(hidden)
    }
}

/// A token-classification model loaded from a local directory.
pub struct TokenClassifier {
    encoder: Encoder,
    classifier: Linear,
    labels: Vec<String>,
    max_positions: usize,
    device: Device,
}

impl TokenClassifier {
    /// Load from `dir`, which must hold `config.json` and `model.safetensors`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let device = Device::Cpu;

        let config_path = dir.join(CONFIG_FILE);
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| PosTagError::io(&config_path, e))?;
        let head: HeadConfig = serde_json::from_str(&config_str)
            .map_err(|e| PosTagError::ModelLoad(format!("Failed to parse config: {}", e)))?;
        let labels = head.labels()?;

        let weights = existing(dir.join(WEIGHTS_FILE))?;
        // SAFETY: the weights file is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device) }?;

        let encoder = Encoder::load(head.architecture(), &config_str, vb.clone())?;
        let classifier = candle_nn::linear(head.hidden_size, labels.len(), vb.pp("classifier"))?;

        info!(
            model = %dir.display(),
            architecture = ?head.architecture(),
            labels = labels.len(),
            max_positions = head.usable_positions(),
            "loaded token classifier"
        );

        Ok(Self {
            encoder,
            classifier,
            labels,
            max_positions: head.usable_positions(),
            device,
        })
    }
}

impl TokenScorer for TokenClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn max_positions(&self) -> usize {
        self.max_positions
    }

    fn score(&self, input_ids: &[u32]) -> Result<Vec<Vec<f32>>> {
        let input = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let hidden = self.encoder.forward(&input)?;
        let logits = self.classifier.forward(&hidden)?;

        Ok(logits.squeeze(0)?.to_dtype(DType::F32)?.to_vec2::<f32>()?)
    }
}

/// Load `tokenizer.json` from a model directory.
pub fn load_tokenizer(dir: impl AsRef<Path>) -> Result<HfTokenizer> {
    let path = existing(dir.as_ref().join(TOKENIZER_FILE))?;
    HfTokenizer::from_file(&path).map_err(|e| PosTagError::Tokenizer(e.to_string()))
}

fn existing(path: PathBuf) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(PosTagError::ModelLoad(format!("{} not found", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(json: &str) -> HeadConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn labels_follow_ids() {
        let h = head(
            r#"{"hidden_size": 8, "max_position_embeddings": 512,
                "id2label": {"1": "NOUN", "0": "DET", "2": "VERB"}}"#,
        );
        assert_eq!(h.labels().unwrap(), vec!["DET", "NOUN", "VERB"]);
        assert_eq!(h.architecture(), Architecture::Bert);
        assert_eq!(h.usable_positions(), 512);
    }

    #[test]
    fn gaps_in_id2label_are_rejected() {
        let h = head(
            r#"{"hidden_size": 8, "max_position_embeddings": 512,
                "id2label": {"0": "DET", "2": "VERB"}}"#,
        );
        assert!(matches!(h.labels(), Err(PosTagError::ModelLoad(_))));
    }

    #[test]
    fn roberta_reserves_leading_positions() {
        let h = head(
            r#"{"hidden_size": 8, "max_position_embeddings": 514, "model_type": "roberta",
                "pad_token_id": 1, "id2label": {"0": "O"}}"#,
        );
        assert_eq!(h.architecture(), Architecture::Roberta);
        assert_eq!(h.usable_positions(), 512);
    }

    #[test]
    fn model_type_selects_encoder() {
        for (model_type, expected) in [
            ("bert", Architecture::Bert),
            ("distilbert", Architecture::Bert),
            ("roberta", Architecture::Roberta),
            ("xlm-roberta", Architecture::Roberta),
            ("camembert", Architecture::Roberta),
        ] {
            let h = head(&format!(
                r#"{{"hidden_size": 8, "max_position_embeddings": 514,
                    "model_type": "{model_type}", "id2label": {{"0": "O"}}}}"#
            ));
            assert_eq!(h.architecture(), expected, "{model_type}");
        }
    }

    #[test]
    fn missing_model_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TokenClassifier::load(dir.path()).is_err());
        assert!(matches!(
            load_tokenizer(dir.path()),
            Err(PosTagError::ModelLoad(_))
        ));
    }
}
