use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One decoded word: surface text, part-of-speech tag and optional rank.
///
/// Serializes as `{"word": ..., "tag": ..., "rank": ...}`; `rank` is omitted
/// when no rank score was merged onto the word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Concatenated token text.
    pub word: String,

    /// Category taken from the label of the word's first token.
    pub tag: String,

    /// Importance rank, the maximum over the word's tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl Word {
    /// Creates an unranked word.
    #[must_use]
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
            rank: None,
        }
    }

    /// Returns `true` if a rank score has been merged onto this word.
    #[must_use]
    pub fn has_rank(&self) -> bool {
        self.rank.is_some()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)?;
        if !self.tag.is_empty() {
            write!(f, "/{}", self.tag)?;
        }
        if let Some(rank) = self.rank {
            write!(f, "/{rank}")?;
        }
        Ok(())
    }
}

/// Renders one sequence as space-separated `word/tag[/rank]` items.
#[must_use]
pub fn format_plain(words: &[Word]) -> String {
    words
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A decoded batch with the metadata shown by front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Number of input sequences.
    pub batch_size: usize,

    /// Wall-clock time spent on the batch in milliseconds.
    pub elapsed_ms: u64,

    /// Decoded words per sequence, in input order.
    pub results: Vec<Vec<Word>>,

    /// Sequences that failed; their slot in `results` is empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SequenceError>,
}

/// A failed sequence within a [`BatchOutput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceError {
    /// Index of the sequence within the batch.
    pub sequence: usize,
    pub error: String,
}

impl BatchOutput {
    #[must_use]
    pub fn new(results: Vec<Vec<Word>>, elapsed_ms: u64) -> Self {
        Self {
            batch_size: results.len(),
            elapsed_ms,
            results,
            errors: Vec::new(),
        }
    }

    /// Build from per-sequence results, recording failures in `errors`.
    #[must_use]
    pub fn from_results<I>(results: I, elapsed_ms: u64) -> Self
    where
        I: IntoIterator<Item = Result<Vec<Word>>>,
    {
        let mut errors = Vec::new();
        let results: Vec<Vec<Word>> = results
            .into_iter()
            .enumerate()
            .map(|(sequence, result)| {
                result.unwrap_or_else(|e| {
                    errors.push(SequenceError {
                        sequence,
                        error: e.to_string(),
                    });
                    Vec::new()
                })
            })
            .collect();
        Self {
            errors,
            ..Self::new(results, elapsed_ms)
        }
    }

    /// Returns `true` if every sequence was analyzed.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LacError;

    #[test]
    fn new_word_is_unranked() {
        let word = Word::new("北京", "LOC");
        assert!(!word.has_rank());
        assert_eq!(word.to_string(), "北京/LOC");
    }

    #[test]
    fn display_omits_empty_tag() {
        let word = Word::new("的", "");
        assert_eq!(word.to_string(), "的");
    }

    #[test]
    fn display_includes_rank() {
        let mut word = Word::new("天气", "n");
        word.rank = Some(3);
        assert_eq!(word.to_string(), "天气/n/3");
    }

    #[test]
    fn format_plain_joins_words() {
        let words = vec![Word::new("今天", "TIME"), Word::new("好", "a")];
        assert_eq!(format_plain(&words), "今天/TIME 好/a");
        assert_eq!(format_plain(&[]), "");
    }

    #[test]
    fn json_skips_missing_rank() {
        let word = Word::new("春天", "SEASON");
        let json = serde_json::to_string(&word).unwrap();
        assert_eq!(json, r#"{"word":"春天","tag":"SEASON"}"#);

        let mut ranked = word.clone();
        ranked.rank = Some(2);
        let json = serde_json::to_string(&ranked).unwrap();
        assert_eq!(json, r#"{"word":"春天","tag":"SEASON","rank":2}"#);
    }

    #[test]
    fn json_escapes_special_characters() {
        let word = Word::new("say \"hi\"\n", "w");
        let json = serde_json::to_string(&word).unwrap();
        assert!(json.contains(r#"say \"hi\"\n"#));
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
    }

    #[test]
    fn batch_output_counts_sequences() {
        let output = BatchOutput::new(vec![vec![Word::new("a", "n")], vec![]], 7);
        assert_eq!(output.batch_size, 2);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"batch_size\":2"));
        assert!(json.contains("\"elapsed_ms\":7"));
        assert!(!json.contains("errors"));
    }

    #[test]
    fn failed_sequence_is_distinguishable_from_empty_query() {
        let output = BatchOutput::from_results(
            vec![
                Ok(vec![Word::new("好", "a")]),
                Ok(Vec::new()),
                Err(LacError::UnknownTagId {
                    id: 9,
                    sequence: 2,
                    position: 0,
                }),
            ],
            3,
        );
        assert_eq!(output.batch_size, 3);
        assert!(!output.is_complete());
        assert!(output.results[1].is_empty());
        assert!(output.results[2].is_empty());
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].sequence, 2);
        assert!(output.errors[0].error.contains("unknown tag id 9"));

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains(r#""errors":[{"sequence":2,"#));
    }
}
