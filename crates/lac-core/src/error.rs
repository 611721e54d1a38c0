use std::path::PathBuf;

use thiserror::Error;

/// Why a raw tag label string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// Fewer characters than the two-character `-X` suffix.
    #[error("label is shorter than its two-character position suffix")]
    TooShort,

    /// The character before the position marker is not `-`.
    #[error("missing '-' separator before the position marker")]
    MissingSeparator,

    /// The position marker is not one of `B`, `I`, `E`, `S`.
    #[error("unknown position marker {0:?}")]
    UnknownMarker(char),
}

/// Errors that can occur while decoding tagger output.
#[derive(Debug, Error)]
pub enum LacError {
    /// A tag label does not follow the `<CATEGORY>-<POSITION>` layout.
    #[error("malformed tag label {label:?} at sequence {sequence}, position {position}: {reason}")]
    MalformedLabel {
        /// The offending raw label.
        label: String,
        /// Index of the sequence within the batch.
        sequence: usize,
        /// Token index within the sequence.
        position: usize,
        /// What is wrong with the label.
        #[source]
        reason: LabelError,
    },

    /// The predictor returned a tag id that has no entry in the label table.
    #[error("unknown tag id {id} at sequence {sequence}, position {position}")]
    UnknownTagId {
        id: i64,
        sequence: usize,
        position: usize,
    },

    /// Parallel arrays (or an offset table and its flat array) disagree in length.
    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A sequence index past the end of the batch.
    #[error("sequence index {index} out of range for a batch of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// An offset table that is empty, does not start at zero or decreases.
    #[error("invalid offset table: {0}")]
    InvalidOffsets(String),

    /// Fewer merged rank scores than decoded words.
    ///
    /// Reported through [`crate::decode::MergeReport`]; the engine logs it and
    /// keeps going, leaving the trailing words unranked.
    #[error("rank alignment shortfall in sequence {sequence}: {words} words, {scores} merged scores")]
    RankAlignmentShortfall {
        sequence: usize,
        words: usize,
        scores: usize,
    },

    /// A rank call was made before a rank predictor was attached.
    #[error("rank mode is not enabled")]
    RankModeDisabled,

    /// A dictionary or model file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dictionary file line could not be parsed.
    #[error("{path}:{line}: {reason}")]
    DictionaryFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The predictor failed or produced unusable output.
    #[error("inference error: {0}")]
    InferenceError(String),
}

/// Result type alias for LAC operations.
pub type Result<T> = std::result::Result<T, LacError>;
