use crfs::{Attribute, Model};

use crate::crf::backend_error;
use crate::error::Result;
use crate::features::FeatureRecord;

/// A trained linear-chain CRF, held as a serialized CRFsuite model.
#[derive(Debug, Clone)]
pub struct CrfModel {
    labels: Vec<String>,
    data: Vec<u8>,
}

impl CrfModel {
    /// Wrap serialized model bytes, checking that they load.
    pub(crate) fn from_bytes(labels: Vec<String>, data: Vec<u8>) -> Result<Self> {
        Model::new(&data).map_err(backend_error)?;
        Ok(Self { labels, data })
    }

    /// Labels known to the model, in the order they were first seen in training.
    pub fn classes(&self) -> &[String] {
        &self.labels
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Most likely label sequence for one sentence.
    pub fn predict_single(&self, sequence: &[FeatureRecord]) -> Result<Vec<String>> {
        let mut tags = self.tag_all([sequence])?;
        Ok(tags.pop().unwrap_or_default())
    }

    /// Most likely label sequence for each sentence.
    pub fn predict(&self, sequences: &[Vec<FeatureRecord>]) -> Result<Vec<Vec<String>>> {
        self.tag_all(sequences.iter().map(Vec::as_slice))
    }

    fn tag_all<'s>(
        &self,
        sequences: impl IntoIterator<Item = &'s [FeatureRecord]>,
    ) -> Result<Vec<Vec<String>>> {
        let model = Model::new(&self.data).map_err(backend_error)?;
        let mut tagger = model.tagger().map_err(backend_error)?;

        let mut out = Vec::new();
        for sequence in sequences {
            if sequence.is_empty() {
                out.push(Vec::new());
                continue;
            }
            let xseq: Vec<Vec<Attribute>> =
                sequence.iter().map(FeatureRecord::attributes).collect();
            let tags = tagger.tag(&xseq).map_err(backend_error)?;
            out.push(tags.into_iter().map(|t| t.to_string()).collect());
        }
        Ok(out)
    }
}
