//! # Dataset Preparation
//!
//! Shuffles a treebank, splits it into training and evaluation parts and
//! turns both parts into aligned feature-record and label sequences.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use oorandom::Rand64;
use tracing::info;

use crate::error::{PosTagError, Result};
use crate::features::{FeatureExtractor, FeatureRecord};
use crate::treebank::Treebank;

/// Default share of sentences used for training.
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Fisher–Yates shuffler.
#[derive(Debug, Clone)]
pub struct Shuffler {
    rng: Rand64,
}

impl Shuffler {
    /// Reproducible shuffling.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Rand64::new(seed as u128),
        }
    }

    /// Seeded from the wall clock; differs from run to run.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self {
            rng: Rand64::new(nanos),
        }
    }

    /// `seeded` when a seed is given, `from_entropy` otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.rand_range(0..(i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

/// Index where the training part ends.
///
/// `len * fraction` rounded half-to-even, so 10 sentences at 0.8 give 8 and
/// 5 sentences at 0.5 give 2.
pub fn split_point(len: usize, fraction: f64) -> Result<usize> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(PosTagError::InvalidFraction(fraction));
    }
    let point = (len as f64 * fraction).round_ties_even() as usize;
    Ok(point.min(len))
}

/// Training and evaluation data, as feature sequences and label sequences.
#[derive(Debug, Clone, Default)]
pub struct PreparedData {
    pub x_train: Vec<Vec<FeatureRecord>>,
    pub y_train: Vec<Vec<String>>,
    pub x_test: Vec<Vec<FeatureRecord>>,
    pub y_test: Vec<Vec<String>>,
}

/// Turns a treebank into training and evaluation sets.
pub struct DatasetPreparer<E> {
    treebank: Treebank,
    extractor: E,
    processed: Vec<Vec<String>>,
}

impl<E: FeatureExtractor> DatasetPreparer<E> {
    pub fn new(treebank: Treebank, extractor: E) -> Self {
        Self {
            treebank,
            extractor,
            processed: Vec::new(),
        }
    }

    /// The treebank in its current (possibly shuffled) order.
    pub fn treebank(&self) -> &Treebank {
        &self.treebank
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Sentences that went through feature extraction, training part first.
    pub fn processed_sentences(&self) -> &[Vec<String>] {
        &self.processed
    }

    /// Shuffle, split at `train_fraction` and extract features for both parts.
    pub fn prepare(&mut self, train_fraction: f64, shuffler: &mut Shuffler) -> Result<PreparedData> {
        let point = split_point(self.treebank.len(), train_fraction)?;
        shuffler.shuffle(&mut self.treebank);

        let treebank = std::mem::take(&mut self.treebank);
        let (train, test) = treebank.split_at(point);
        let (x_train, y_train) = self.process(train);
        let (x_test, y_test) = self.process(test);
        info!(
            train = y_train.len(),
            test = y_test.len(),
            fraction = train_fraction,
            "split treebank"
        );
        self.treebank = treebank;

        Ok(PreparedData {
            x_train,
            y_train,
            x_test,
            y_test,
        })
    }

    fn process(
        &mut self,
        sentences: &[crate::treebank::Sentence],
    ) -> (Vec<Vec<FeatureRecord>>, Vec<Vec<String>>) {
        let mut x = Vec::with_capacity(sentences.len());
        let mut y = Vec::with_capacity(sentences.len());

        for sentence in sentences {
            self.processed.push(sentence.words().to_vec());
            x.push(self.extractor.sentence_features(sentence.words()));
            y.push(sentence.tag_labels());
        }

        (x, y)
    }

    /// Write processed sentences, one per line, until more than `num_words`
    /// words have been written. The sentence that crosses the limit is kept.
    pub fn save_sentences(&self, path: impl AsRef<Path>, num_words: usize) -> Result<usize> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PosTagError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| PosTagError::io(path, e))?;
        let mut out = BufWriter::new(file);

        let mut written = 0usize;
        for sentence in &self.processed {
            written += sentence.len();
            writeln!(out, "{}", sentence.join(" ")).map_err(|e| PosTagError::io(path, e))?;
            if written > num_words {
                break;
            }
        }
        out.flush().map_err(|e| PosTagError::io(path, e))?;

        info!(path = %path.display(), words = written, "saved sentence sample");
        Ok(written)
    }
}
