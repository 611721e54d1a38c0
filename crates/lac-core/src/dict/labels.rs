use std::collections::HashMap;

use tracing::warn;

use crate::dict::DictLine;
use crate::error::{LabelError, LacError, Result};
use crate::types::{Position, TagLabel};

/// One entry of the id→label table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelEntry {
    Valid(TagLabel),
    /// Kept so that a sequence using it fails with a precise error instead of
    /// the whole table failing to load.
    Malformed { raw: String, reason: LabelError },
}

/// Maps predictor tag ids to parsed labels.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: HashMap<i64, LabelEntry>,
    reverse: HashMap<TagLabel, i64>,
}

impl LabelTable {
    /// Build the table from `(id, raw label)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for (id, raw) in entries {
            table.insert(id, raw.as_ref());
        }
        table
    }

    /// Build from `tag.dic` (`id`, `label`) lines.
    pub fn from_pairs(lines: Vec<DictLine>) -> Result<Self> {
        let mut table = Self::default();
        for line in lines {
            let id: i64 = line
                .key
                .trim()
                .parse()
                .map_err(|_| line.error(format!("invalid tag id {:?}", line.key)))?;
            table.insert(id, &line.value);
        }
        Ok(table)
    }

    fn insert(&mut self, id: i64, raw: &str) {
        let entry = match TagLabel::parse(raw) {
            Ok(label) => {
                self.reverse.entry(label.clone()).or_insert(id);
                LabelEntry::Valid(label)
            }
            Err(reason) => {
                warn!(id, label = raw, %reason, "malformed label in tag table");
                LabelEntry::Malformed {
                    raw: raw.to_string(),
                    reason,
                }
            }
        };
        self.entries.insert(id, entry);
    }

    pub fn get(&self, id: i64) -> Option<&LabelEntry> {
        self.entries.get(&id)
    }

    /// Id of a label, if the table has it.
    pub fn id_of(&self, label: &TagLabel) -> Option<i64> {
        self.reverse.get(label).copied()
    }

    /// Id of `category` with `position`, degrading `E` to `I` and `S` to `B`
    /// for label sets that only have begin/inside markers.
    pub fn id_for(&self, category: &str, position: Position) -> Option<i64> {
        let exact = TagLabel::new(category, position);
        self.id_of(&exact).or_else(|| {
            let fallback = match position {
                Position::End => Position::Inside,
                Position::Single => Position::Begin,
                Position::Begin | Position::Inside => return None,
            };
            self.id_of(&exact.with_position(fallback))
        })
    }

    /// Resolve the tag ids of one sequence.
    ///
    /// Fails with [`LacError::UnknownTagId`] or [`LacError::MalformedLabel`]
    /// carrying `sequence` and the offending position.
    pub fn resolve_sequence(&self, ids: &[i64], sequence: usize) -> Result<Vec<TagLabel>> {
        ids.iter()
            .enumerate()
            .map(|(position, &id)| match self.entries.get(&id) {
                Some(LabelEntry::Valid(label)) => Ok(label.clone()),
                Some(LabelEntry::Malformed { raw, reason }) => Err(LacError::MalformedLabel {
                    label: raw.clone(),
                    sequence,
                    position,
                    reason: reason.clone(),
                }),
                None => Err(LacError::UnknownTagId {
                    id,
                    sequence,
                    position,
                }),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
