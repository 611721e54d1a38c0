//! # Tag Boundary Decoder
//!
//! Groups tagged tokens into words. A token whose label is `B` or `S` opens a
//! new word; `I` and `E` tokens extend the open word. The first token of a
//! sequence always opens a word, whatever its marker.

use crate::decode::offsets::OffsetTable;
use crate::error::{LacError, Result};
use crate::types::{TagLabel, Word};

/// Decode one sequence of tokens and their labels into words.
///
/// A word's tag is the category of the label that opened it; continuation
/// tokens never change it.
///
/// # Examples
/// ```
/// use lac_core::decode::decode;
/// use lac_core::types::TagLabel;
///
/// let labels: Vec<TagLabel> = ["a-B", "a-I", "a-E"]
///     .iter()
///     .map(|l| l.parse().unwrap())
///     .collect();
/// let words = decode(&["北", "京", "市"], &labels).unwrap();
/// assert_eq!(words.len(), 1);
/// assert_eq!(words[0].word, "北京市");
/// assert_eq!(words[0].tag, "a");
/// ```
pub fn decode<S: AsRef<str>>(tokens: &[S], labels: &[TagLabel]) -> Result<Vec<Word>> {
    if tokens.len() != labels.len() {
        return Err(LacError::LengthMismatch {
            context: "tokens and tags",
            expected: tokens.len(),
            actual: labels.len(),
        });
    }

    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for (token, label) in tokens.iter().zip(labels) {
        match current.as_mut() {
            Some(open) if !label.starts_word() => open.word.push_str(token.as_ref()),
            _ => words.extend(current.replace(Word::new(token.as_ref(), label.category.as_str()))),
        }
    }
    words.extend(current);

    Ok(words)
}

/// Decode every sequence of a flat batch.
///
/// `tokens` and `labels` are flat arrays laid out by `offsets`. Sequences are
/// decoded independently and returned in batch order.
pub fn decode_batch<S: AsRef<str>>(
    tokens: &[S],
    labels: &[TagLabel],
    offsets: &OffsetTable,
) -> Result<Vec<Vec<Word>>> {
    offsets.check_flat("tokens", tokens.len())?;
    offsets.check_flat("tags", labels.len())?;

    offsets
        .ranges()
        .map(|range| decode(&tokens[range.clone()], &labels[range]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_labels;

    fn labels(raw: &[&str]) -> Vec<TagLabel> {
        parse_labels(raw, 0).unwrap()
    }

    #[test]
    fn test_single_token_sequence() {
        let words = decode(&["好"], &labels(&["a-S"])).unwrap();
        assert_eq!(words, vec![Word::new("好", "a")]);
    }

    #[test]
    fn test_multi_token_word() {
        let words = decode(&["北", "京", "市"], &labels(&["a-B", "a-I", "a-E"])).unwrap();
        assert_eq!(words, vec![Word::new("北京市", "a")]);
    }

    #[test]
    fn test_mixed_words() {
        let tokens = ["我", "爱", "北", "京", "天", "安", "门"];
        let tags = labels(&["r-S", "v-S", "LOC-B", "LOC-E", "LOC-B", "LOC-I", "LOC-I"]);
        let words = decode(&tokens, &tags).unwrap();

        let texts: Vec<_> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(texts, vec!["我", "爱", "北京", "天安门"]);
        assert_eq!(words[0].tag, "r");
        assert_eq!(words[3].tag, "LOC");
    }

    #[test]
    fn test_first_token_continuation_opens_word() {
        let words = decode(&["京", "市"], &labels(&["n-I", "n-E"])).unwrap();
        assert_eq!(words, vec![Word::new("京市", "n")]);

        let words = decode(&["市"], &labels(&["ns-E"])).unwrap();
        assert_eq!(words, vec![Word::new("市", "ns")]);
    }

    #[test]
    fn test_category_fixed_by_opening_token() {
        let words = decode(&["天", "气"], &labels(&["n-B", "v-I"])).unwrap();
        assert_eq!(words, vec![Word::new("天气", "n")]);
    }

    #[test]
    fn test_single_after_begin_closes_word() {
        let words = decode(&["a", "b", "c"], &labels(&["n-B", "w-S", "n-E"])).unwrap();
        let texts: Vec<_> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(texts, vec!["a", "bc"]);
    }

    #[test]
    fn test_decode_coverage() {
        let tokens = ["今", "天", "天", "气", "真", "好", "啊"];
        let tags = labels(&["TIME-B", "TIME-I", "n-B", "n-I", "d-S", "a-S", "xc-S"]);
        let words = decode(&tokens, &tags).unwrap();

        let joined: String = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(joined, tokens.concat());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let tokens = ["春", "天", "来", "了"];
        let tags = labels(&["SEASON-B", "SEASON-E", "v-S", "u-S"]);
        let first = decode(&tokens, &tags).unwrap();
        let second = decode(&tokens, &tags).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_sequence() {
        let tokens: [&str; 0] = [];
        assert!(decode(&tokens, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let err = decode(&["a", "b"], &labels(&["n-S"])).unwrap_err();
        assert!(matches!(
            err,
            LacError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_batch_preserves_order() {
        let tokens = ["你", "好", "世", "界", "!"];
        let tags = labels(&["v-B", "v-E", "n-B", "n-E", "w-S"]);
        let offsets = OffsetTable::build([2, 0, 3]);

        let batch = decode_batch(&tokens, &tags, &offsets).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], vec![Word::new("你好", "v")]);
        assert!(batch[1].is_empty());
        assert_eq!(batch[2], vec![Word::new("世界", "n"), Word::new("!", "w")]);
    }

    #[test]
    fn test_decode_batch_sequences_do_not_bleed() {
        // Second sequence starts with a continuation tag; it must not extend
        // the last word of the first sequence.
        let tokens = ["a", "b"];
        let tags = labels(&["n-B", "n-I"]);
        let offsets = OffsetTable::build([1, 1]);

        let batch = decode_batch(&tokens, &tags, &offsets).unwrap();
        assert_eq!(batch, vec![vec![Word::new("a", "n")], vec![Word::new("b", "n")]]);
    }

    #[test]
    fn test_decode_batch_rejects_bad_table() {
        let tokens = ["a", "b"];
        let tags = labels(&["n-B", "n-I"]);
        let offsets = OffsetTable::build([3]);
        assert!(decode_batch(&tokens, &tags, &offsets).is_err());
    }
}
