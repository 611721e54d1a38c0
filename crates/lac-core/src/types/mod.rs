pub mod label;
pub mod word;

pub use label::{parse_labels, Position, TagLabel};
pub use word::{format_plain, BatchOutput, SequenceError, Word};
