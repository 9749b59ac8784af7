//! Raw-text clean-up applied before tagging.

use std::ops::RangeInclusive;
use std::path::Path;

use tracing::info;

use crate::error::{PosTagError, Result};

/// A fixed sequence of text rewrites.
///
/// Steps run in this order: page-number lines are removed, literal
/// substitutions are applied in insertion order, then leading characters
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNormalizer {
    page_numbers: Option<RangeInclusive<u32>>,
    replacements: Vec<(String, String)>,
    skip_chars: usize,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean-up for the Spanish report input: page numbers 2 to 40 stripped,
    /// newlines joined, hyphens turned into commas, bullets removed and the
    /// first two characters dropped.
    pub fn spanish_report() -> Self {
        Self::new()
            .with_page_numbers(2..=40)
            .with_replacement("\n", " ")
            .with_replacement("-", ",")
            .with_replacement("• ", "")
            .with_skipped_prefix(2)
    }

    /// Every newline becomes a space.
    pub fn collapse_newlines() -> Self {
        Self::new().with_replacement("\n", " ")
    }

    /// Replace every `"\n{n}\n"` with `"\n"` for `n` in `pages`, ascending.
    pub fn with_page_numbers(mut self, pages: RangeInclusive<u32>) -> Self {
        self.page_numbers = Some(pages);
        self
    }

    pub fn with_replacement(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.replacements.push((from.into(), to.into()));
        self
    }

    /// Drop the first `count` characters (not bytes).
    pub fn with_skipped_prefix(mut self, count: usize) -> Self {
        self.skip_chars = count;
        self
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut out = text.to_string();

        if let Some(pages) = &self.page_numbers {
            for page in pages.clone() {
                let marker = format!("\n{page}\n");
                if out.contains(&marker) {
                    out = out.replace(&marker, "\n");
                }
            }
        }

        for (from, to) in &self.replacements {
            out = out.replace(from.as_str(), to);
        }

        if self.skip_chars == 0 {
            return out;
        }
        let cut = out.char_indices().nth(self.skip_chars).map(|(i, _)| i);
        match cut {
            Some(byte) => out.split_off(byte),
            None => String::new(),
        }
    }

    /// Read `input`, normalize it and write the result to `output`.
    pub fn normalize_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<String> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let raw = std::fs::read_to_string(input).map_err(|e| PosTagError::io(input, e))?;
        let text = self.normalize(&raw);

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PosTagError::io(parent, e))?;
        }
        std::fs::write(output, &text).map_err(|e| PosTagError::io(output, e))?;

        info!(
            input = %input.display(),
            output = %output.display(),
            chars = text.chars().count(),
            "normalized input text"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_report_preset() {
        let raw = "• Primera línea\n2\nsegunda-parte\n• punto\n41\nfin";
        let text = TextNormalizer::spanish_report().normalize(raw);
        // Page 2 goes, 41 is out of range and stays.
        assert_eq!(text, "imera línea segunda,parte punto 41 fin");
    }

    #[test]
    fn page_numbers_are_removed_in_ascending_order() {
        // After "\n3\n" becomes "\n", a "\n4\n" marker appears and is removed too.
        let raw = "a\n3\n4\nb";
        let text = TextNormalizer::new().with_page_numbers(2..=40).normalize(raw);
        assert_eq!(text, "a\nb");

        let raw = "a\n1\nb";
        let text = TextNormalizer::new().with_page_numbers(2..=40).normalize(raw);
        assert_eq!(text, raw);
    }

    #[test]
    fn collapse_newlines_preset() {
        let text = TextNormalizer::collapse_newlines().normalize("The cat\nsat\n\non the mat.");
        assert_eq!(text, "The cat sat  on the mat.");
    }

    #[test]
    fn skip_prefix_counts_chars() {
        let n = TextNormalizer::new().with_skipped_prefix(2);
        assert_eq!(n.normalize("ñañ"), "ñ");
        assert_eq!(n.normalize("a"), "");
        assert_eq!(TextNormalizer::new().normalize(""), "");
    }

    #[test]
    fn normalize_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("assets").join("out.txt");
        std::fs::write(&input, "one\ntwo").unwrap();

        let text = TextNormalizer::collapse_newlines()
            .normalize_file(&input, &output)
            .unwrap();
        assert_eq!(text, "one two");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "one two");
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextNormalizer::new()
            .normalize_file(dir.path().join("nope.txt"), dir.path().join("out.txt"))
            .unwrap_err();
        assert!(matches!(err, PosTagError::Io { .. }));
    }
}
