//! # LAC Core
//!
//! Post-processing for a character-level lexical analyzer: turns the
//! per-character tag ids predicted by a sequence tagger into words with
//! part-of-speech tags, applies user dictionaries, and merges optional
//! per-character importance scores into per-word ranks.
//!
//! ## Quick Start
//!
//! ```rust
//! use lac_core::types::parse_labels;
//! use lac_core::decode;
//!
//! let tokens = ["我", "爱", "北", "京"];
//! let labels = parse_labels(&["r-S", "v-S", "LOC-B", "LOC-E"], 0).unwrap();
//! let words = decode(&tokens, &labels).unwrap();
//!
//! assert_eq!(words[2].word, "北京");
//! assert_eq!(words[2].tag, "LOC");
//! ```
//!
//! A full pipeline is driven by [`Lac`], loaded from a model directory:
//!
//! ```rust,no_run
//! use lac_core::{Lac, LacConfig};
//!
//! let mut lac = Lac::from_config(&LacConfig::new("models/lac_model")).unwrap();
//! for word in lac.run("百度是一家高科技公司").unwrap() {
//!     println!("{word}");
//! }
//! ```
pub mod config;
pub mod decode;
pub mod dict;
pub mod engine;
pub mod error;
pub mod predictor;
pub mod tokenizer;
pub mod types;

// Re-export primary API
pub use config::LacConfig;
pub use decode::{
    decode, decode_batch, BoundaryRule, Customization, MergeReport, OffsetTable, RankMerger,
    TagOverlay,
};
pub use dict::{LabelTable, Resources, Vocabulary};
pub use engine::{Lac, SequenceResult};
pub use error::{LabelError, LacError, Result};
pub use predictor::{LexiconPredictor, RankPredictor, TagPredictor};
pub use tokenizer::{Token, Tokenizer};
pub use types::{
    format_plain, parse_labels, BatchOutput, Position, SequenceError, TagLabel, Word,
};
