//! # Predictor Interfaces
//!
//! The tagging and rank models are black boxes behind these traits. Both
//! work on flat id arrays laid out by an [`OffsetTable`] and return one value
//! per input token.

pub mod lexicon;

use crate::decode::OffsetTable;
use crate::error::Result;

pub use lexicon::LexiconPredictor;

/// A sequence tagger: token ids in, one tag id per token out.
pub trait TagPredictor: Send {
    /// Predict tag ids for a flat batch of token ids.
    fn predict(&mut self, input_ids: &[i64], offsets: &OffsetTable) -> Result<Vec<i64>>;

    /// A handle for another worker. Implementations share their weights.
    fn fork(&self) -> Result<Box<dyn TagPredictor>>;
}

/// A token importance model fed with token ids and the tagger's raw tag ids.
pub trait RankPredictor: Send {
    /// Predict one non-negative score per token.
    fn predict(
        &mut self,
        input_ids: &[i64],
        tag_ids: &[i64],
        offsets: &OffsetTable,
    ) -> Result<Vec<i64>>;

    /// A handle for another worker. Implementations share their weights.
    fn fork(&self) -> Result<Box<dyn RankPredictor>>;
}
