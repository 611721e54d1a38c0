//! # Tag Labels
//!
//! Tagger output labels have the layout `<CATEGORY>-<POSITION>`, e.g. `n-B`
//! or `PER-I`. The last two characters are reserved: a `-` separator and one
//! position marker. Labels are parsed once into [`TagLabel`] when the label
//! table is loaded, so the decoder and the rank merger never look at raw
//! strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, LacError, Result};

/// Position of a token within a word (the BIES scheme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// First token of a multi-token word.
    Begin,
    /// Interior token.
    Inside,
    /// Last token of a multi-token word.
    End,
    /// A word made of one token.
    Single,
}

impl Position {
    /// All markers in `B`, `I`, `E`, `S` order.
    pub fn all() -> &'static [Position] {
        &[
            Position::Begin,
            Position::Inside,
            Position::End,
            Position::Single,
        ]
    }

    /// The one-character marker used in raw labels.
    pub fn marker(self) -> char {
        match self {
            Position::Begin => 'B',
            Position::Inside => 'I',
            Position::End => 'E',
            Position::Single => 'S',
        }
    }

    /// Parse a one-character marker.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            'B' => Some(Position::Begin),
            'I' => Some(Position::Inside),
            'E' => Some(Position::End),
            'S' => Some(Position::Single),
            _ => None,
        }
    }

    /// Whether a token with this marker opens a new word.
    pub fn starts_word(self) -> bool {
        matches!(self, Position::Begin | Position::Single)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// A parsed tag label: part-of-speech category plus position marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagLabel {
    pub category: String,
    pub position: Position,
}

impl TagLabel {
    /// Create a label from its parts.
    pub fn new(category: impl Into<String>, position: Position) -> Self {
        Self {
            category: category.into(),
            position,
        }
    }

    /// Parse a raw label such as `"n-B"`.
    ///
    /// The category is everything before the two-character suffix and may be
    /// empty (`"-S"` is a valid label with an empty category).
    pub fn parse(raw: &str) -> std::result::Result<Self, LabelError> {
        let mut tail = raw.char_indices().rev();
        let (_, marker) = tail.next().ok_or(LabelError::TooShort)?;
        let (sep_idx, sep) = tail.next().ok_or(LabelError::TooShort)?;
        if sep != '-' {
            return Err(LabelError::MissingSeparator);
        }
        let position = Position::from_marker(marker).ok_or(LabelError::UnknownMarker(marker))?;
        Ok(Self::new(&raw[..sep_idx], position))
    }

    /// Whether this label opens a new word.
    pub fn starts_word(&self) -> bool {
        self.position.starts_word()
    }

    /// The same category with another position marker.
    pub fn with_position(&self, position: Position) -> Self {
        Self::new(self.category.clone(), position)
    }
}

impl FromStr for TagLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TagLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category, self.position)
    }
}

/// Parse the raw labels of one sequence, reporting the first bad one with its location.
pub fn parse_labels<S: AsRef<str>>(raw: &[S], sequence: usize) -> Result<Vec<TagLabel>> {
    raw.iter()
        .enumerate()
        .map(|(position, label)| {
            let label = label.as_ref();
            TagLabel::parse(label).map_err(|reason| LacError::MalformedLabel {
                label: label.to_string(),
                sequence,
                position,
                reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_roundtrip() {
        for pos in Position::all() {
            assert_eq!(Position::from_marker(pos.marker()), Some(*pos));
        }
        assert_eq!(Position::from_marker('O'), None);
    }

    #[test]
    fn test_parse_basic() {
        let label = TagLabel::parse("n-B").unwrap();
        assert_eq!(label.category, "n");
        assert_eq!(label.position, Position::Begin);

        let label = TagLabel::parse("PER-I").unwrap();
        assert_eq!(label.category, "PER");
        assert_eq!(label.position, Position::Inside);
    }

    #[test]
    fn test_parse_keeps_inner_dashes() {
        let label: TagLabel = "x-B-E".parse().unwrap();
        assert_eq!(label.category, "x-B");
        assert_eq!(label.position, Position::End);
    }

    #[test]
    fn test_parse_empty_category() {
        let label = TagLabel::parse("-S").unwrap();
        assert_eq!(label.category, "");
        assert!(label.starts_word());
    }

    #[test]
    fn test_parse_multibyte_category() {
        let label = TagLabel::parse("地名-S").unwrap();
        assert_eq!(label.category, "地名");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(TagLabel::parse(""), Err(LabelError::TooShort));
        assert_eq!(TagLabel::parse("B"), Err(LabelError::TooShort));
        assert_eq!(TagLabel::parse("nB"), Err(LabelError::MissingSeparator));
        assert_eq!(TagLabel::parse("n-X"), Err(LabelError::UnknownMarker('X')));
        assert_eq!(TagLabel::parse("O"), Err(LabelError::TooShort));
    }

    #[test]
    fn test_display_roundtrip() {
        let label = TagLabel::new("LOC", Position::Single);
        assert_eq!(label.to_string(), "LOC-S");
        assert_eq!(TagLabel::parse(&label.to_string()).unwrap(), label);
    }

    #[test]
    fn test_parse_labels_reports_location() {
        let err = parse_labels(&["n-B", "n-I", "bad"], 4).unwrap_err();
        match err {
            LacError::MalformedLabel {
                label,
                sequence,
                position,
                reason,
            } => {
                assert_eq!(label, "bad");
                assert_eq!(sequence, 4);
                assert_eq!(position, 2);
                assert_eq!(reason, LabelError::MissingSeparator);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
