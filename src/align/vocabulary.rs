//! Bag-of-words expansion of the free-text attribute.

use crate::core::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default cap on the number of tokens kept from training text.
pub const DEFAULT_MAX_VOCABULARY: usize = 1000;

/// Closed token set fit on training text; one output column per token.
///
/// Tokens are kept sorted, which fixes the order of the generated columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    tokens: Vec<String>,
}

impl Vocabulary {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        let mut tokens: Vec<String> = tokens.into_iter().collect();
        tokens.sort();
        tokens.dedup();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens
            .binary_search_by(|entry| entry.as_str().cmp(token))
            .ok()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index_of(token).is_some()
    }
}

/// Turns a text column into numeric word-count columns.
///
/// Implementations must be deterministic: the same vocabulary and texts always
/// produce the same columns.
pub trait TextVectorizer {
    /// Learn the token set from the training text column.
    fn fit_vocabulary(&self, texts: &[&str]) -> Result<Vocabulary>;

    /// One column per vocabulary token, each holding a value per input text.
    fn apply_vocabulary(&self, vocabulary: &Vocabulary, texts: &[&str]) -> Result<Vec<Vec<f64>>>;
}

/// Whitespace tokenizer with per-row occurrence counts.
#[derive(Debug, Clone)]
pub struct BagOfWords {
    max_words: usize,
}

impl Default for BagOfWords {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VOCABULARY)
    }
}

impl BagOfWords {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }
}

impl TextVectorizer for BagOfWords {
    fn fit_vocabulary(&self, texts: &[&str]) -> Result<Vocabulary> {
        // Document frequency: a token counts once per text it appears in.
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for text in texts {
            let mut tokens: Vec<&str> = text.split_whitespace().collect();
            tokens.sort_unstable();
            tokens.dedup();
            for token in tokens {
                *document_frequency.entry(token).or_default() += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = document_frequency.into_iter().collect();
        if ranked.len() > self.max_words {
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            ranked.truncate(self.max_words);
        }

        Ok(Vocabulary::new(
            ranked.into_iter().map(|(token, _)| token.to_string()),
        ))
    }

    fn apply_vocabulary(&self, vocabulary: &Vocabulary, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        let mut columns = vec![vec![0.0; texts.len()]; vocabulary.len()];
        for (row, text) in texts.iter().enumerate() {
            for token in text.split_whitespace() {
                if let Some(column) = vocabulary.index_of(token) {
                    columns[column][row] += 1.0;
                }
            }
        }
        Ok(columns)
    }
}
