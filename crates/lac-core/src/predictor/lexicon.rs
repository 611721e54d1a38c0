//! # Lexicon Predictor
//!
//! A dictionary tagger used when no neural model is available. It segments
//! each sequence by forward maximum matching against a `word<TAB>CATEGORY`
//! lexicon and emits the matching tag ids. Tokens covered by no entry become
//! single-token words of the fallback category.
//!
//! Matching happens on token ids, so lexicon words are normalized the same
//! way as queries. Entries containing out-of-vocabulary characters are
//! skipped because every unknown character shares one id.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::decode::OffsetTable;
use crate::dict::{read_pairs, DictLine, Resources};
use crate::error::{LacError, Result};
use crate::predictor::TagPredictor;
use crate::tokenizer::Tokenizer;
use crate::types::Position;

#[derive(Debug)]
struct LexiconIndex {
    /// Token-id sequence → tag id per token.
    entries: HashMap<Vec<i64>, Vec<i64>>,
    max_len: usize,
    fallback_tag: i64,
}

/// Forward-maximum-matching tagger over a lexicon.
#[derive(Debug, Clone)]
pub struct LexiconPredictor {
    index: Arc<LexiconIndex>,
}

impl LexiconPredictor {
    /// Load a lexicon file and index it against the model's dictionaries.
    pub fn from_file(
        path: impl AsRef<Path>,
        resources: &Resources,
        fallback_category: &str,
    ) -> Result<Self> {
        let path = path.as_ref();
        let lines = read_pairs(path)?;
        let predictor = Self::from_lines(lines, resources, fallback_category)?;
        info!(
            path = %path.display(),
            entries = predictor.index.entries.len(),
            "loaded lexicon"
        );
        Ok(predictor)
    }

    /// Index `word`/`category` lines.
    pub fn from_lines(
        lines: Vec<DictLine>,
        resources: &Resources,
        fallback_category: &str,
    ) -> Result<Self> {
        let labels = &resources.labels;
        let fallback_tag = labels
            .id_for(fallback_category, Position::Single)
            .ok_or_else(|| {
                LacError::InferenceError(format!(
                    "fallback category {fallback_category:?} has no label in the tag table"
                ))
            })?;

        let tokenizer = Tokenizer::new();
        let oov = resources.vocab.oov_id();
        let mut entries = HashMap::with_capacity(lines.len());
        let mut max_len = 0;
        let mut skipped = 0usize;

        for line in &lines {
            let ids: Vec<i64> = tokenizer
                .tokenize(&line.key)
                .iter()
                .map(|t| resources.vocab.id_of(&t.text))
                .collect();
            if ids.is_empty() || ids.contains(&oov) {
                skipped += 1;
                continue;
            }

            let category = line.value.trim();
            let tags = word_positions(ids.len())
                .map(|pos| {
                    labels.id_for(category, pos).ok_or_else(|| {
                        line.error(format!("category {category:?} has no {pos} label"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            max_len = max_len.max(ids.len());
            entries.insert(ids, tags);
        }
        if skipped > 0 {
            debug!(skipped, "skipped lexicon entries with out-of-vocabulary characters");
        }

        Ok(Self {
            index: Arc::new(LexiconIndex {
                entries,
                max_len,
                fallback_tag,
            }),
        })
    }

    fn tag_sequence(&self, ids: &[i64], out: &mut Vec<i64>) {
        let index = &self.index;
        let mut i = 0;
        while i < ids.len() {
            let longest = (1..=index.max_len.min(ids.len() - i))
                .rev()
                .find_map(|len| index.entries.get(&ids[i..i + len]));
            match longest {
                Some(tags) => {
                    out.extend_from_slice(tags);
                    i += tags.len();
                }
                None => {
                    out.push(index.fallback_tag);
                    i += 1;
                }
            }
        }
    }
}

/// Position markers of a word spanning `len` tokens.
fn word_positions(len: usize) -> impl Iterator<Item = Position> {
    (0..len).map(move |i| match (i, len) {
        (_, 1) => Position::Single,
        (0, _) => Position::Begin,
        (i, len) if i + 1 == len => Position::End,
        _ => Position::Inside,
    })
}

impl TagPredictor for LexiconPredictor {
    fn predict(&mut self, input_ids: &[i64], offsets: &OffsetTable) -> Result<Vec<i64>> {
        offsets.check_flat("input ids", input_ids.len())?;
        let mut out = Vec::with_capacity(input_ids.len());
        for range in offsets.ranges() {
            self.tag_sequence(&input_ids[range], &mut out);
        }
        Ok(out)
    }

    fn fork(&self) -> Result<Box<dyn TagPredictor>> {
        Ok(Box::new(self.clone()))
    }
}
