//! # User-Dictionary Overlay
//!
//! An overlay may rewrite a sequence's labels before decoding to force word
//! boundaries. The decoder only relies on the [`TagOverlay`] contract: labels
//! are rewritten in place, so the sequence length never changes, and every
//! label is still a [`TagLabel`].
//!
//! [`Customization`] is the dictionary-backed overlay. Each dictionary line is
//! a phrase written as whitespace-separated segments, each optionally
//! followed by `/CATEGORY`:
//!
//! ```text
//! 春天/SEASON
//! 花开/v 时节/n
//! 南京市长江大桥
//! ```
//!
//! Wherever a phrase occurs in a sequence (leftmost, longest match first),
//! its tokens decode as exactly the listed segments.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{LacError, Result};
use crate::tokenizer::Token;
use crate::types::{Position, TagLabel};

/// Rewrites predicted labels before they are decoded.
pub trait TagOverlay: Send + Sync {
    /// Rewrite zero or more entries of `labels`; `labels[i]` belongs to `tokens[i]`.
    fn apply(&self, tokens: &[Token], labels: &mut [TagLabel]);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    /// Byte length of the segment text.
    len: usize,
    category: Option<String>,
}

/// Dictionary-backed overlay that forces user phrases into fixed segments.
#[derive(Debug, Clone, Default)]
pub struct Customization {
    phrases: HashMap<String, Vec<Segment>>,
    max_phrase_len: usize,
}

impl Customization {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LacError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let custom = Self::from_reader(BufReader::new(file), path)?;
        info!(path = %path.display(), phrases = custom.len(), "loaded user dictionary");
        Ok(custom)
    }

    /// Read dictionary lines from `reader`; `path` is only used in errors.
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut custom = Self::new();
        for line in reader.lines() {
            let line = line.map_err(|source| LacError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            custom.add_phrase(&line);
        }
        Ok(custom)
    }

    /// Add one dictionary line. Blank lines are ignored; there is no comment
    /// syntax, so `#话题` is an ordinary phrase.
    pub fn add_phrase(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let mut phrase = String::new();
        let mut segments = Vec::new();
        for item in line.split_whitespace() {
            let (text, category) = split_segment(item);
            phrase.push_str(text);
            segments.push(Segment {
                len: text.len(),
                category: category.map(str::to_string),
            });
        }

        self.max_phrase_len = self.max_phrase_len.max(phrase.len());
        self.phrases.insert(phrase, segments);
    }

    /// Number of phrases in the dictionary.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Longest phrase starting at token `start`, as `(end_token, segments)`.
    fn longest_match(&self, tokens: &[Token], start: usize) -> Option<(usize, &[Segment])> {
        let mut text = String::new();
        let mut best = None;
        for (end, token) in tokens.iter().enumerate().skip(start) {
            text.push_str(&token.text);
            if text.len() > self.max_phrase_len {
                break;
            }
            if let Some(segments) = self.phrases.get(&text) {
                best = Some((end + 1, segments.as_slice()));
            }
        }
        best
    }

    fn rewrite(&self, tokens: &[Token], labels: &mut [TagLabel], start: usize, segments: &[Segment]) {
        let mut seg_iter = segments.iter();
        let mut current = seg_iter.next();
        let mut seg_start = 0;
        let mut offset = 0;
        let mut seg_category = None;

        for idx in start..tokens.len() {
            let Some(segment) = current else { break };
            let label = &mut labels[idx];
            if offset == seg_start {
                let category = segment
                    .category
                    .clone()
                    .unwrap_or_else(|| label.category.clone());
                *label = TagLabel::new(category.as_str(), Position::Begin);
                seg_category = Some(category);
            } else if let Some(category) = &seg_category {
                *label = TagLabel::new(category.as_str(), Position::Inside);
            }

            offset += tokens[idx].text.len();
            while let Some(segment) = current {
                if offset < seg_start + segment.len {
                    break;
                }
                seg_start += segment.len;
                current = seg_iter.next();
            }
        }
    }
}

/// Split `text/CATEGORY`; a missing or empty part after the last `/` means no category.
fn split_segment(item: &str) -> (&str, Option<&str>) {
    match item.rsplit_once('/') {
        Some((text, category)) if !text.is_empty() && !category.is_empty() => {
            (text, Some(category))
        }
        _ => (item, None),
    }
}

impl TagOverlay for Customization {
    fn apply(&self, tokens: &[Token], labels: &mut [TagLabel]) {
        let len = tokens.len().min(labels.len());
        let mut i = 0;
        while i < len {
            let Some((end, segments)) = self.longest_match(&tokens[..len], i) else {
                i += 1;
                continue;
            };
            self.rewrite(&tokens[..end], labels, i, segments);
            // Keep the following token from gluing onto the phrase.
            if let Some(next) = labels.get_mut(end) {
                if !next.starts_word() {
                    next.position = Position::Begin;
                }
            }
            i = end;
        }
    }
}
