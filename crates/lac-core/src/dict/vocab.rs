use std::collections::HashMap;

use crate::dict::DictLine;
use crate::error::Result;

/// Token text → id lookup with normalization and an out-of-vocabulary fallback.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word2id: HashMap<String, i64>,
    q2b: HashMap<String, String>,
    oov_id: i64,
}

impl Vocabulary {
    /// Build a vocabulary.
    ///
    /// The OOV id is the id of `oov_token` when the vocabulary has it, and
    /// otherwise `len - 1`.
    pub fn new(
        word2id: HashMap<String, i64>,
        q2b: HashMap<String, String>,
        oov_token: &str,
    ) -> Self {
        let oov_id = word2id
            .get(oov_token)
            .copied()
            .unwrap_or(word2id.len() as i64 - 1);
        Self {
            word2id,
            q2b,
            oov_id,
        }
    }

    /// Build from `word.dic` (`id`, `word`) and `q2b.dic` (`from`, `to`) lines.
    pub fn from_pairs(words: Vec<DictLine>, q2b: Vec<DictLine>, oov_token: &str) -> Result<Self> {
        let mut word2id = HashMap::with_capacity(words.len());
        for line in words {
            let id: i64 = line
                .key
                .trim()
                .parse()
                .map_err(|_| line.error(format!("invalid word id {:?}", line.key)))?;
            word2id.insert(line.value, id);
        }

        let q2b = q2b.into_iter().map(|line| (line.key, line.value)).collect();
        Ok(Self::new(word2id, q2b, oov_token))
    }

    /// Apply the normalization table (e.g. full-width → half-width).
    pub fn normalize<'a>(&'a self, token: &'a str) -> &'a str {
        self.q2b.get(token).map(String::as_str).unwrap_or(token)
    }

    /// Id of a token after normalization, or the OOV id.
    pub fn id_of(&self, token: &str) -> i64 {
        self.word2id
            .get(self.normalize(token))
            .copied()
            .unwrap_or(self.oov_id)
    }

    pub fn oov_id(&self) -> i64 {
        self.oov_id
    }

    pub fn len(&self) -> usize {
        self.word2id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word2id.is_empty()
    }
}
