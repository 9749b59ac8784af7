//! # Universal PoS Tags
//!
//! The 17 coarse part-of-speech categories shared by every Universal
//! Dependencies treebank.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Universal Dependencies part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UposTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl UposTag {
    /// Total number of distinct tags.
    pub const NUM_TAGS: usize = 17;

    /// Get all tags in index order.
    pub fn all_tags() -> &'static [UposTag] {
        &[
            UposTag::Adj,
            UposTag::Adp,
            UposTag::Adv,
            UposTag::Aux,
            UposTag::Cconj,
            UposTag::Det,
            UposTag::Intj,
            UposTag::Noun,
            UposTag::Num,
            UposTag::Part,
            UposTag::Pron,
            UposTag::Propn,
            UposTag::Punct,
            UposTag::Sconj,
            UposTag::Sym,
            UposTag::Verb,
            UposTag::X,
        ]
    }

    /// Get the tag index.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get tag from index.
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::all_tags().get(idx).copied()
    }

    /// The tag as written in CoNLL-U files.
    pub fn as_str(&self) -> &'static str {
        match self {
            UposTag::Adj => "ADJ",
            UposTag::Adp => "ADP",
            UposTag::Adv => "ADV",
            UposTag::Aux => "AUX",
            UposTag::Cconj => "CCONJ",
            UposTag::Det => "DET",
            UposTag::Intj => "INTJ",
            UposTag::Noun => "NOUN",
            UposTag::Num => "NUM",
            UposTag::Part => "PART",
            UposTag::Pron => "PRON",
            UposTag::Propn => "PROPN",
            UposTag::Punct => "PUNCT",
            UposTag::Sconj => "SCONJ",
            UposTag::Sym => "SYM",
            UposTag::Verb => "VERB",
            UposTag::X => "X",
        }
    }
}

impl fmt::Display for UposTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a UPOS tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown UPOS tag {:?}", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for UposTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UposTag::all_tags()
            .iter()
            .find(|tag| tag.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_index_roundtrip() {
        for tag in UposTag::all_tags() {
            assert_eq!(UposTag::from_index(tag.index()), Some(*tag));
        }
        assert_eq!(UposTag::all_tags().len(), UposTag::NUM_TAGS);
        assert_eq!(UposTag::from_index(UposTag::NUM_TAGS), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("PROPN".parse::<UposTag>(), Ok(UposTag::Propn));
        assert_eq!(UposTag::Cconj.to_string(), "CCONJ");
        assert!("NN".parse::<UposTag>().is_err());
        assert!("noun".parse::<UposTag>().is_err());
    }
}
