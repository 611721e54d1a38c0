//! # Model Dictionaries
//!
//! Read-only tables loaded once per model and shared by every worker:
//! the vocabulary with its normalization table, and the id→label table.
//!
//! All files are tab-separated, two columns per line:
//!
//! | file      | columns          |
//! |-----------|------------------|
//! | `word.dic`| `id<TAB>word`    |
//! | `q2b.dic` | `from<TAB>to`    |
//! | `tag.dic` | `id<TAB>label`   |

pub mod labels;
pub mod vocab;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::config::LacConfig;
use crate::error::{LacError, Result};

pub use labels::{LabelEntry, LabelTable};
pub use vocab::Vocabulary;

/// The immutable dictionaries of one model.
#[derive(Debug, Clone)]
pub struct Resources {
    pub vocab: Vocabulary,
    pub labels: LabelTable,
}

impl Resources {
    pub fn new(vocab: Vocabulary, labels: LabelTable) -> Self {
        Self { vocab, labels }
    }

    /// Load `word.dic`, `q2b.dic` and `tag.dic` from the paths in `config`.
    pub fn load(config: &LacConfig) -> Result<Self> {
        let words = read_pairs(&config.word_dict_path())?;
        let q2b = read_pairs(&config.q2b_dict_path())?;
        let tags = read_pairs(&config.tag_dict_path())?;

        let vocab = Vocabulary::from_pairs(words, q2b, &config.oov_token)?;
        let labels = LabelTable::from_pairs(tags)?;
        info!(
            model_dir = %config.model_dir.display(),
            words = vocab.len(),
            labels = labels.len(),
            oov_id = vocab.oov_id(),
            "loaded model dictionaries"
        );
        Ok(Self::new(vocab, labels))
    }
}

/// One parsed dictionary line, remembered with its location for error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictLine {
    pub path: std::path::PathBuf,
    pub line: usize,
    pub key: String,
    pub value: String,
}

impl DictLine {
    /// Build a format error pointing at this line.
    pub fn error(&self, reason: impl Into<String>) -> LacError {
        LacError::DictionaryFormat {
            path: self.path.clone(),
            line: self.line,
            reason: reason.into(),
        }
    }
}

/// Read a two-column tab-separated file.
pub fn read_pairs(path: &Path) -> Result<Vec<DictLine>> {
    let file = File::open(path).map_err(|source| LacError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pairs(BufReader::new(file), path)
}

/// Parse two-column tab-separated lines from `reader`; `path` is only used in errors.
///
/// Only line terminators are stripped, since the columns themselves may be
/// whitespace (the normalization table maps the full-width space).
pub fn parse_pairs<R: BufRead>(reader: R, path: &Path) -> Result<Vec<DictLine>> {
    let mut pairs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LacError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once('\t').ok_or_else(|| LacError::DictionaryFormat {
            path: path.to_path_buf(),
            line: idx + 1,
            reason: "expected two tab-separated columns".into(),
        })?;
        pairs.push(DictLine {
            path: path.to_path_buf(),
            line: idx + 1,
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let data = "0\tOOV\n\n1\t北\r\n2\t \n";
        let pairs = parse_pairs(data.as_bytes(), Path::new("word.dic")).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].key, "0");
        assert_eq!(pairs[1].value, "北");
        assert_eq!(pairs[1].line, 3);
        assert_eq!(pairs[2].value, " ");
    }

    #[test]
    fn test_parse_pairs_rejects_single_column() {
        let err = parse_pairs("0 OOV\n".as_bytes(), Path::new("word.dic")).unwrap_err();
        match err {
            LacError::DictionaryFormat { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_model_dir() {
        let config = LacConfig::new("/nonexistent/lac_model");
        assert!(matches!(Resources::load(&config), Err(LacError::Io { .. })));
    }
}
