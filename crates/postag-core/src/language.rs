//! Languages with a Universal Dependencies training treebank.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PosTagError;

/// Writing system, used to pick a feature extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Cyrillic,
    Han,
    Japanese,
}

/// A language whose UD v2.5 training treebank is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Spanish,
    Italian,
    French,
    Chinese,
    Japanese,
    Russian,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::Spanish,
            Language::Italian,
            Language::French,
            Language::Chinese,
            Language::Japanese,
            Language::Russian,
        ]
    }

    /// Training file relative to the UD release root.
    pub fn treebank_path(&self) -> &'static str {
        match self {
            Language::English => "UD_English-GUM/en_gum-ud-train.conllu",
            Language::Spanish => "UD_Spanish-GSD/es_gsd-ud-train.conllu",
            Language::Italian => "UD_Italian-ISDT/it_isdt-ud-train.conllu",
            Language::French => "UD_French-GSD/fr_gsd-ud-train.conllu",
            Language::Chinese => "UD_Chinese-GSD/zh_gsd-ud-train.conllu",
            Language::Japanese => "UD_Japanese-GSD/ja_gsd-ud-train.conllu",
            Language::Russian => "UD_Russian-GSD/ru_gsd-ud-train.conllu",
        }
    }

    pub fn script(&self) -> Script {
        match self {
            Language::English | Language::Spanish | Language::Italian | Language::French => {
                Script::Latin
            }
            Language::Chinese => Script::Han,
            Language::Japanese => Script::Japanese,
            Language::Russian => Script::Cyrillic,
        }
    }

    /// Name used in result tables and output file names.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::French => "French",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Russian => "Russian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = PosTagError;

    /// Accepts English names and Spanish names, with or without accents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                'ñ' => 'n',
                other => other,
            })
            .collect();

        match key.as_str() {
            "english" | "ingles" | "en" => Ok(Language::English),
            "spanish" | "espanol" | "es" => Ok(Language::Spanish),
            "italian" | "italiano" | "it" => Ok(Language::Italian),
            "french" | "frances" | "fr" => Ok(Language::French),
            "chinese" | "chino" | "zh" => Ok(Language::Chinese),
            "japanese" | "japones" | "ja" => Ok(Language::Japanese),
            "russian" | "ruso" | "ru" => Ok(Language::Russian),
            _ => Err(PosTagError::UnsupportedLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_spanish_keys() {
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Inglés".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Español".parse::<Language>().unwrap(), Language::Spanish);
        assert_eq!("japones".parse::<Language>().unwrap(), Language::Japanese);
    }

    #[test]
    fn unknown_key_is_unsupported() {
        let err = "Klingon".parse::<Language>().unwrap_err();
        assert!(matches!(err, PosTagError::UnsupportedLanguage(k) if k == "Klingon"));
    }

    #[test]
    fn treebank_paths_are_conllu() {
        for lang in Language::all() {
            assert!(lang.treebank_path().ends_with("-ud-train.conllu"));
        }
    }

    #[test]
    fn scripts() {
        assert_eq!(Language::French.script(), Script::Latin);
        assert_eq!(Language::Russian.script(), Script::Cyrillic);
        assert_eq!(Language::Chinese.script(), Script::Han);
    }
}
