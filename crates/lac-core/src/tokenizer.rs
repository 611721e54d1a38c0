//! # Tokenizer
//!
//! Splits a query into the character tokens the tagger works on.

/// A token with its byte span in the original query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text, exactly as it appears in the query
    pub text: String,
    /// Start byte offset in the original string
    pub start: usize,
    /// End byte offset in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Character-level tokenizer for UTF-8 input.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Split a query into one token per character.
    ///
    /// # Examples
    /// ```
    /// use lac_core::tokenizer::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("北京 2024");
    /// assert_eq!(tokens.len(), 7);
    /// assert_eq!(tokens[0].text, "北");
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(input.len());
        self.tokenize_into(input, &mut tokens);
        tokens
    }

    /// Like [`Tokenizer::tokenize`], reusing `out`'s allocation.
    pub fn tokenize_into(&self, input: &str, out: &mut Vec<Token>) {
        out.clear();
        for (index, (start, c)) in input.char_indices().enumerate() {
            let end = start + c.len_utf8();
            out.push(Token {
                text: input[start..end].to_string(),
                start,
                end,
                index,
            });
        }
    }

    /// Get the original byte span covered by tokens `start_idx..end_idx`.
    pub fn get_spans(
        &self,
        tokens: &[Token],
        start_idx: usize,
        end_idx: usize,
    ) -> Option<(usize, usize)> {
        if start_idx >= tokens.len() || end_idx > tokens.len() || start_idx >= end_idx {
            return None;
        }

        Some((tokens[start_idx].start, tokens[end_idx - 1].end))
    }
}
