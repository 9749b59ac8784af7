//! # Treebanks
//!
//! A treebank is an ordered list of sentences, each a pair of aligned word
//! and tag sequences. Sources implement [`TreebankSource`]; every call to
//! [`TreebankSource::load`] returns a treebank owned by the caller.

pub mod conllu;
pub mod upos;

use crate::error::{PosTagError, Result};

pub use conllu::{UdTreebank, parse_conllu, parse_conllu_str};
pub use upos::UposTag;

/// One annotated sentence: words and their UPOS tags, always the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    words: Vec<String>,
    tags: Vec<UposTag>,
}

impl Sentence {
    /// Build a sentence, rejecting word/tag sequences of different lengths.
    pub fn new(words: Vec<String>, tags: Vec<UposTag>) -> Result<Self> {
        if words.len() != tags.len() {
            return Err(PosTagError::LengthMismatch {
                words: words.len(),
                tags: tags.len(),
            });
        }
        Ok(Self { words, tags })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn tags(&self) -> &[UposTag] {
        &self.tags
    }

    /// Tags as the strings used for CRF labels.
    pub fn tag_labels(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// An ordered collection of annotated sentences.
pub type Treebank = Vec<Sentence>;

/// Something that can produce a treebank.
///
/// New formats are added as new implementations. Implementations must not
/// keep the produced sentences around: each `load` builds a fresh container.
pub trait TreebankSource {
    /// Read the source and return its sentences in file order.
    fn load(&self) -> Result<Treebank>;
}
