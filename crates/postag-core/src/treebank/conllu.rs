//! # CoNLL-U Reader
//!
//! Reads Universal Dependencies treebanks through the `conllu` reader and
//! keeps FORM and UPOS of every token.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use conllu::io::{ReadSentence, Reader};
use tracing::info;

use crate::error::{PosTagError, Result};
use crate::treebank::{Sentence, Treebank, TreebankSource, UposTag};

/// A Universal Dependencies treebank file inside a UD release directory.
#[derive(Debug, Clone)]
pub struct UdTreebank {
    dataset_root: PathBuf,
    relative_path: PathBuf,
}

impl UdTreebank {
    /// # Arguments
    /// * `dataset_root` - The UD release directory (e.g. `ud-treebanks-v2.5`)
    /// * `relative_path` - The annotated file inside it (e.g. `UD_English-GUM/en_gum-ud-train.conllu`)
    pub fn new(dataset_root: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_root: dataset_root.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Full path of the annotated file.
    pub fn path(&self) -> PathBuf {
        self.dataset_root.join(&self.relative_path)
    }
}

impl TreebankSource for UdTreebank {
    fn load(&self) -> Result<Treebank> {
        let path = self.path();
        let file = File::open(&path).map_err(|e| PosTagError::io(&path, e))?;
        let treebank = parse_conllu(BufReader::new(file))?;
        info!(path = %path.display(), sentences = treebank.len(), "loaded UD treebank");
        Ok(treebank)
    }
}

/// Parse CoNLL-U from any buffered reader.
pub fn parse_conllu<R: BufRead>(reader: R) -> Result<Treebank> {
    let mut reader = Reader::new(reader);
    let mut treebank = Vec::new();

    while let Some(graph) = reader
        .read_sentence()
        .map_err(|e| PosTagError::MalformedConllu(e.to_string()))?
    {
        let mut words = Vec::new();
        let mut tags = Vec::new();
        for token in graph.iter().filter_map(|node| node.token()) {
            let upos = token.upos().unwrap_or("_");
            let tag = upos.parse::<UposTag>().map_err(|_| PosTagError::UnknownUpos {
                sentence: treebank.len() + 1,
                tag: upos.to_string(),
            })?;
            words.push(token.form().to_string());
            tags.push(tag);
        }
        if !words.is_empty() {
            treebank.push(Sentence::new(words, tags)?);
        }
    }

    Ok(treebank)
}

/// Parse CoNLL-U held in memory.
pub fn parse_conllu_str(text: &str) -> Result<Treebank> {
    parse_conllu(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
# sent_id = 1
# text = Time flies.
1\tTime\ttime\tNOUN\tNN\t_\t2\tnsubj\t_\t_
2\tflies\tfly\tVERB\tVBZ\t_\t0\troot\t_\tSpaceAfter=No
3\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

# sent_id = 2
1\tde\tde\tADP\t_\t_\t3\tcase\t_\t_
2\tel\tel\tDET\t_\t_\t3\tdet\t_\t_
3\tmar\tmar\tNOUN\t_\t_\t0\troot\t_\t_
";

    #[test]
    fn parses_forms_and_upos() {
        let treebank = parse_conllu_str(SAMPLE).unwrap();
        assert_eq!(treebank.len(), 2);

        assert_eq!(treebank[0].words(), &["Time", "flies", "."]);
        assert_eq!(
            treebank[0].tags(),
            &[UposTag::Noun, UposTag::Verb, UposTag::Punct]
        );

        assert_eq!(treebank[1].words(), &["de", "el", "mar"]);
        assert_eq!(
            treebank[1].tags(),
            &[UposTag::Adp, UposTag::Det, UposTag::Noun]
        );
    }

    #[test]
    fn every_sentence_is_aligned() {
        for sentence in parse_conllu_str(SAMPLE).unwrap() {
            assert_eq!(sentence.words().len(), sentence.tags().len());
        }
    }

    #[test]
    fn rejects_wrong_column_count() {
        let err = parse_conllu_str("1\tTime\tNOUN\n").unwrap_err();
        assert!(matches!(err, PosTagError::MalformedConllu(_)));
    }

    #[test]
    fn rejects_unknown_upos() {
        let text = format!("{SAMPLE}\n1\tTime\ttime\tNN\t_\t_\t0\troot\t_\t_\n");
        match parse_conllu_str(&text).unwrap_err() {
            PosTagError::UnknownUpos { sentence, tag } => {
                assert_eq!(sentence, 3);
                assert_eq!(tag, "NN");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_upos_is_rejected() {
        let text = "1\tTime\ttime\t_\t_\t_\t0\troot\t_\t_\n";
        assert!(matches!(
            parse_conllu_str(text),
            Err(PosTagError::UnknownUpos { sentence: 1, .. })
        ));
    }

    #[test]
    fn empty_input_gives_empty_treebank() {
        assert!(parse_conllu_str("").unwrap().is_empty());
    }

    #[test]
    fn ud_treebank_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("UD_Test");
        std::fs::create_dir_all(&sub).unwrap();
        let mut file = File::create(sub.join("test.conllu")).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = UdTreebank::new(dir.path(), "UD_Test/test.conllu");
        let first = source.load().unwrap();
        let second = source.load().unwrap();

        // Each load gets its own container.
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = UdTreebank::new("/definitely/not/here", "x.conllu");
        assert!(matches!(source.load(), Err(PosTagError::Io { .. })));
    }
}
