//! # Rank Score Merger
//!
//! The rank model scores every token. Scores are merged to word granularity
//! by walking the tagger's labels again: each word boundary starts a new
//! merged score, and continuation tokens raise it to their own score if
//! higher. Merged scores are then assigned to decoded words by position.

use serde::{Deserialize, Serialize};

use crate::error::{LacError, Result};
use crate::types::{TagLabel, Word};

/// How the merger decides that a label starts a new word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryRule {
    /// The position marker is `B` or `S`; the decoder's own rule.
    #[default]
    Suffix,
    /// The rendered label contains `-B` or `-S` anywhere.
    ///
    /// Kept for parity with older rank pipelines. It differs from
    /// [`BoundaryRule::Suffix`] only for categories that themselves contain
    /// `-B` or `-S`.
    Substring,
}

impl BoundaryRule {
    /// Whether `label` starts a new word under this rule.
    pub fn is_boundary(self, label: &TagLabel) -> bool {
        match self {
            BoundaryRule::Suffix => label.starts_word(),
            BoundaryRule::Substring => {
                let raw = label.to_string();
                raw.contains("-B") || raw.contains("-S")
            }
        }
    }
}

/// Outcome of assigning merged scores to one sequence's words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of decoded words.
    pub words: usize,
    /// Number of merged scores produced from the labels.
    pub scores: usize,
}

impl MergeReport {
    /// Number of words that received a rank.
    pub fn ranked(&self) -> usize {
        self.words.min(self.scores)
    }

    /// Returns `true` when some trailing words were left without a rank.
    pub fn is_shortfall(&self) -> bool {
        self.scores < self.words
    }

    /// The shortfall as an error value, for callers that collect warnings.
    pub fn shortfall(&self, sequence: usize) -> Option<LacError> {
        self.is_shortfall().then_some(LacError::RankAlignmentShortfall {
            sequence,
            words: self.words,
            scores: self.scores,
        })
    }
}

/// Merges per-token rank scores into per-word scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankMerger {
    rule: BoundaryRule,
}

impl RankMerger {
    pub fn new(rule: BoundaryRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> BoundaryRule {
        self.rule
    }

    /// Collapse token scores into one score per word (maximum over the word).
    ///
    /// # Examples
    /// ```
    /// use lac_core::decode::RankMerger;
    /// use lac_core::types::parse_labels;
    ///
    /// let labels = parse_labels(&["n-B", "n-E"], 0).unwrap();
    /// let merged = RankMerger::default().merge_scores(&labels, &[3, 7]).unwrap();
    /// assert_eq!(merged, vec![7]);
    /// ```
    pub fn merge_scores(&self, labels: &[TagLabel], scores: &[u32]) -> Result<Vec<u32>> {
        if labels.len() != scores.len() {
            return Err(LacError::LengthMismatch {
                context: "tags and rank scores",
                expected: labels.len(),
                actual: scores.len(),
            });
        }

        let mut merged: Vec<u32> = Vec::new();
        for (label, &score) in labels.iter().zip(scores) {
            match merged.last_mut() {
                Some(last) if !self.rule.is_boundary(label) => *last = (*last).max(score),
                _ => merged.push(score),
            }
        }
        Ok(merged)
    }

    /// Merge scores and assign them to `words` by position.
    ///
    /// `labels` are the tagger's labels before any user-dictionary override,
    /// so the word count here can differ from `words.len()`. Surplus scores
    /// are dropped; missing scores leave trailing words unranked and show up
    /// in the returned report.
    pub fn merge(
        &self,
        labels: &[TagLabel],
        scores: &[u32],
        words: &mut [Word],
    ) -> Result<MergeReport> {
        let merged = self.merge_scores(labels, scores)?;
        for (word, &score) in words.iter_mut().zip(&merged) {
            word.rank = Some(score);
        }

        Ok(MergeReport {
            words: words.len(),
            scores: merged.len(),
        })
    }
}
