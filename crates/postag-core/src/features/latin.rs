//! # Latin-Alphabet Features
//!
//! Orthographic and context features for languages written in the Latin
//! alphabet: word identity, casing, affixes, neighbouring words and
//! digit/hyphen flags.
//!
//! Two historical quirks are kept as-is because trained models depend on
//! them:
//! - `prefix-3` and `suffix-3` hold four characters (the three-character
//!   value was overwritten by the four-character one under the same key).
//! - `is_alphanumeric` only fires for words that *end* in an ASCII digit and
//!   contain an ASCII letter somewhere.
//!
//! The `next_word` boundary check never looked at the following word. That
//! is the default too; [`LatinFeatureExtractor::with_next_word_lookup`]
//! turns on the real lookup.

use regex::Regex;

use crate::error::Result;
use crate::features::{FeatureExtractor, FeatureRecord};

/// Characters with Unicode Numeric_Type Decimal (`Nd`) or Digit. Fractions,
/// Roman numerals and other `No`/`Nl` numbers are excluded.
const DIGITS_ONLY: &str = concat!(
    r"^[\p{Nd}",
    r"\x{B2}\x{B3}\x{B9}\x{1369}-\x{1371}\x{19DA}",
    r"\x{2070}\x{2074}-\x{2079}\x{2080}-\x{2089}",
    r"\x{2460}-\x{2468}\x{2474}-\x{247C}\x{2488}-\x{2490}",
    r"\x{24EA}\x{24F5}-\x{24FD}\x{24FF}",
    r"\x{2776}-\x{277E}\x{2780}-\x{2788}\x{278A}-\x{2792}",
    r"\x{10A40}-\x{10A43}\x{10E60}-\x{10E68}\x{11052}-\x{1105A}",
    r"\x{1F100}-\x{1F10A}",
    r"]+$",
);

/// Feature extractor for Latin-alphabet languages.
#[derive(Debug, Clone)]
pub struct LatinFeatureExtractor {
    ends_with_digit: Regex,
    has_ascii_letter: Regex,
    digits_only: Regex,
    next_word_lookup: bool,
}

impl LatinFeatureExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            ends_with_digit: Regex::new(r"[0-9]$")?,
            has_ascii_letter: Regex::new(r"[a-zA-Z]")?,
            digits_only: Regex::new(DIGITS_ONLY)?,
            next_word_lookup: false,
        })
    }

    /// When enabled, `next_word` holds the following word (empty only for the
    /// last word). Disabled by default, which leaves `next_word` empty everywhere.
    pub fn with_next_word_lookup(mut self, enabled: bool) -> Self {
        self.next_word_lookup = enabled;
        self
    }

    fn is_alphanumeric(&self, word: &str) -> i64 {
        (self.ends_with_digit.is_match(word) && self.has_ascii_letter.is_match(word)) as i64
    }

    fn next_word<'a>(&self, sentence: &'a [String], index: usize) -> &'a str {
        if self.next_word_lookup && index + 1 < sentence.len() {
            &sentence[index + 1]
        } else {
            ""
        }
    }
}

impl FeatureExtractor for LatinFeatureExtractor {
    fn extract(&self, sentence: &[String], index: usize) -> FeatureRecord {
        let word = sentence[index].as_str();
        let mut record = FeatureRecord::new();

        record.insert("word", word);
        record.insert("is_first", index == 0);
        record.insert("is_last", index + 1 == sentence.len());
        record.insert("is_capitalized", first_char_is_upper(word));
        record.insert("is_all_caps", word.to_uppercase() == word);
        record.insert("is_all_lower", word.to_lowercase() == word);
        record.insert("is_alphanumeric", self.is_alphanumeric(word));
        record.insert("prefix-1", prefix(word, 1));
        record.insert("prefix-2", prefix(word, 2));
        record.insert("prefix-3", prefix(word, 4));
        record.insert("suffix-1", suffix(word, 1));
        record.insert("suffix-2", suffix(word, 2));
        record.insert("suffix-3", suffix(word, 4));
        record.insert(
            "prev_word",
            if index == 0 { "" } else { sentence[index - 1].as_str() },
        );
        record.insert("next_word", self.next_word(sentence, index));
        record.insert("has_hyphen", word.contains('-'));
        record.insert("is_numeric", self.digits_only.is_match(word));
        record.insert("capitals_inside", capitals_inside(word));

        record
    }
}

/// Upper-casing the first character leaves it unchanged. Digits and
/// punctuation count as capitalized.
fn first_char_is_upper(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.to_uppercase().eq(std::iter::once(c)))
}

fn capitals_inside(word: &str) -> bool {
    let rest: String = word.chars().skip(1).collect();
    rest.to_lowercase() != rest
}

fn prefix(word: &str, n: usize) -> String {
    word.chars().take(n).collect()
}

fn suffix(word: &str, n: usize) -> String {
    let count = word.chars().count();
    word.chars().skip(count.saturating_sub(n)).collect()
}
