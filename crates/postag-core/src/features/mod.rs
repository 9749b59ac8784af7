//! # Feature Extraction
//!
//! Turns a word in its sentence into a [`FeatureRecord`]: a small map from
//! feature name to a string, boolean or integer value. Records are pure
//! functions of the sentence text and the word index.
//!
//! The CRF consumes records as weighted attributes (see
//! [`FeatureRecord::attributes`]).

pub mod latin;

use std::collections::BTreeMap;

use crfs::Attribute;
use serde::{Deserialize, Serialize};

use crate::error::{PosTagError, Result};
use crate::language::{Language, Script};

pub use latin::LatinFeatureExtractor;

/// Value of a single feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Str(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Str(v.to_string())
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

/// Features of one word, keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureRecord {
    features: BTreeMap<&'static str, FeatureValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a feature, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: &'static str, value: impl Into<FeatureValue>) {
        self.features.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// Shorthand for string features.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.features.get(name) {
            Some(FeatureValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Shorthand for boolean features.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.features.get(name) {
            Some(FeatureValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        self.features.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Attributes as seen by the CRF.
    ///
    /// Strings become `name:value` with weight 1, booleans and integers keep
    /// the name and use their numeric value as weight. Zero weights are
    /// dropped since they never contribute to a score.
    pub fn attributes(&self) -> Vec<Attribute> {
        self.features
            .iter()
            .filter_map(|(name, value)| {
                let attr = match value {
                    FeatureValue::Str(s) => Attribute::new(format!("{name}:{s}"), 1.0),
                    FeatureValue::Bool(b) => Attribute::new(*name, if *b { 1.0 } else { 0.0 }),
                    FeatureValue::Int(i) => Attribute::new(*name, *i as f64),
                };
                (attr.value != 0.0).then_some(attr)
            })
            .collect()
    }
}

/// Produces a feature record for a word at a given position.
pub trait FeatureExtractor {
    /// Features for `sentence[index]`.
    ///
    /// # Panics
    /// When `index` is out of bounds for `sentence`.
    fn extract(&self, sentence: &[String], index: usize) -> FeatureRecord;

    /// One record per word, aligned with `sentence`.
    fn sentence_features(&self, sentence: &[String]) -> Vec<FeatureRecord> {
        (0..sentence.len())
            .map(|i| self.extract(sentence, i))
            .collect()
    }
}

impl<E: FeatureExtractor + ?Sized> FeatureExtractor for Box<E> {
    fn extract(&self, sentence: &[String], index: usize) -> FeatureRecord {
        (**self).extract(sentence, index)
    }
}

/// Pick the feature extractor for a language's writing system.
///
/// Only Latin-alphabet feature logic exists; other scripts are rejected.
pub fn extractor_for(language: Language) -> Result<Box<dyn FeatureExtractor>> {
    match language.script() {
        Script::Latin => Ok(Box::new(LatinFeatureExtractor::new()?)),
        _ => Err(PosTagError::UnsupportedLanguage(format!(
            "{language} (no feature extractor for {:?} script)",
            language.script()
        ))),
    }
}
