//! # Configuration
//!
//! Where a model's files live and the knobs of the decoding pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decode::BoundaryRule;

/// Configuration for a [`crate::Lac`] instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LacConfig {
    /// Model directory; dictionaries are read from its `conf/` subdirectory
    pub model_dir: PathBuf,
    /// Optional user dictionary applied before decoding
    pub user_dict: Option<PathBuf>,
    /// Lexicon for the lexicon predictor; `conf/lexicon.dic` when unset.
    /// Stock LAC model directories do not ship one.
    #[serde(default)]
    pub lexicon: Option<PathBuf>,
    /// Vocabulary entry whose id is used for unknown tokens
    pub oov_token: String,
    /// Word boundary rule used when merging rank scores
    pub boundary_rule: BoundaryRule,
    /// Category given by the lexicon predictor to unmatched tokens
    pub fallback_category: String,
}

impl Default for LacConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/lac_model"),
            user_dict: None,
            lexicon: None,
            oov_token: "OOV".to_string(),
            boundary_rule: BoundaryRule::Suffix,
            fallback_category: "n".to_string(),
        }
    }
}

impl LacConfig {
    /// Create a configuration for the model in `model_dir`.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Self::default()
        }
    }

    /// Set the user dictionary.
    pub fn with_user_dict(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_dict = Some(path.into());
        self
    }

    /// Read the lexicon from `path` instead of `conf/lexicon.dic`.
    pub fn with_lexicon(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon = Some(path.into());
        self
    }

    /// Set the out-of-vocabulary token name.
    pub fn with_oov_token(mut self, token: impl Into<String>) -> Self {
        self.oov_token = token.into();
        self
    }

    /// Set the rank merge boundary rule.
    pub fn with_boundary_rule(mut self, rule: BoundaryRule) -> Self {
        self.boundary_rule = rule;
        self
    }

    /// Set the lexicon predictor's fallback category.
    pub fn with_fallback_category(mut self, category: impl Into<String>) -> Self {
        self.fallback_category = category.into();
        self
    }

    fn conf_file(&self, name: &str) -> PathBuf {
        self.model_dir.join("conf").join(name)
    }

    pub fn word_dict_path(&self) -> PathBuf {
        self.conf_file("word.dic")
    }

    pub fn q2b_dict_path(&self) -> PathBuf {
        self.conf_file("q2b.dic")
    }

    pub fn tag_dict_path(&self) -> PathBuf {
        self.conf_file("tag.dic")
    }

    /// The configured lexicon, or `conf/lexicon.dic` in the model directory.
    pub fn lexicon_path(&self) -> PathBuf {
        self.lexicon
            .clone()
            .unwrap_or_else(|| self.conf_file("lexicon.dic"))
    }

    /// The model directory.
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}
