//! Word splitting for the vectorizer

use super::stopwords::{StopWordSet, StopWords};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Runs of Unicode letters or digits; everything else is a boundary
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid word pattern");
}

/// Splits text into terms: optional lowercasing, splitting on
/// non-alphanumeric boundaries, then length and stop-word filtering.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    lowercase: bool,
    min_token_len: usize,
    stop_words: StopWordSet,
}

impl Tokenizer {
    pub fn new(lowercase: bool, min_token_len: usize, stop_words: StopWords) -> Self {
        Self {
            lowercase,
            min_token_len,
            stop_words: stop_words.compile(),
        }
    }

    /// Tokenize a single document, in reading order
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        WORD.find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| token.chars().count() >= self.min_token_len)
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(true, 2, StopWords::English)
    }
}
