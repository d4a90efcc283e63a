//! TF-IDF vectorization
//!
//! Turns raw documents into a [`TermWeightMatrix`]:
//! - tokenize (lowercase, split on non-alphanumerics, drop stop words)
//! - build the vocabulary in order of first appearance
//! - weight = TF × IDF with `idf(t) = ln((1 + N) / (1 + df(t))) + 1`
//! - L2-normalize every row
//!
//! # Example
//!
//! ```
//! use docmap::vectorize::{vectorize, VectorizerOptions};
//!
//! let docs = ["cat dog", "dog cat", "car engine"];
//! let (matrix, vocabulary) = vectorize(&docs, &VectorizerOptions::default()).unwrap();
//! assert_eq!(matrix.n_documents(), 3);
//! assert_eq!(vocabulary.terms(), &["cat", "dog", "car", "engine"]);
//! ```

pub mod stopwords;
pub mod tokenizer;

pub use stopwords::{StopWordSet, StopWords};
pub use tokenizer::Tokenizer;

use crate::error::{PipelineError, Result};
use crate::matrix::TermWeightMatrix;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How raw term counts become term frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TermFrequency {
    /// Raw count of the term in the document
    #[default]
    Raw,
    /// Count divided by the number of surviving tokens in the document
    LengthNormalized,
}

/// Vectorizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerOptions {
    /// Lowercase text before splitting
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Tokens shorter than this (in characters) are dropped
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    #[serde(default)]
    pub stop_words: StopWords,

    #[serde(default)]
    pub term_frequency: TermFrequency,

    /// L2-normalize every document row
    #[serde(default = "default_true")]
    pub normalize: bool,
}

fn default_true() -> bool {
    true
}

fn default_min_token_len() -> usize {
    2
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_len: default_min_token_len(),
            stop_words: StopWords::English,
            term_frequency: TermFrequency::Raw,
            normalize: true,
        }
    }
}

/// Ordered, deduplicated set of terms; the position of a term is its
/// matrix column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Column of `term`, inserting it at the end if unseen
    fn intern(&mut self, term: &str) -> usize {
        if let Some(&idx) = self.index.get(term) {
            return idx;
        }
        let idx = self.terms.len();
        self.terms.push(term.to_string());
        self.index.insert(term.to_string(), idx);
        idx
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A vectorizer fitted on a corpus: vocabulary plus IDF weights. Extra text
/// can be projected onto the same columns with [`Vectorizer::transform`].
#[derive(Debug, Clone)]
pub struct Vectorizer {
    options: VectorizerOptions,
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    idf: Vec<f64>,
}

impl Vectorizer {
    /// Learn vocabulary and IDF from `documents` and return the weighted
    /// matrix of those same documents.
    pub fn fit<S: AsRef<str>>(
        documents: &[S],
        options: &VectorizerOptions,
    ) -> Result<(Self, TermWeightMatrix)> {
        let tokenizer = Tokenizer::new(
            options.lowercase,
            options.min_token_len,
            options.stop_words.clone(),
        );

        let mut vocabulary = Vocabulary::default();
        let mut doc_counts: Vec<Vec<(usize, usize)>> = Vec::with_capacity(documents.len());
        let mut doc_lengths = Vec::with_capacity(documents.len());

        for doc in documents {
            let tokens = tokenizer.tokenize(doc.as_ref());
            doc_lengths.push(tokens.len());

            // Keep first-occurrence order so rows are built deterministically
            let mut counts: Vec<(usize, usize)> = Vec::new();
            let mut slot: HashMap<usize, usize> = HashMap::new();
            for token in &tokens {
                let col = vocabulary.intern(token);
                match slot.get(&col) {
                    Some(&pos) => counts[pos].1 += 1,
                    None => {
                        slot.insert(col, counts.len());
                        counts.push((col, 1));
                    }
                }
            }
            doc_counts.push(counts);
        }

        if vocabulary.is_empty() {
            return Err(PipelineError::EmptyVocabulary);
        }

        let n_docs = documents.len();
        let mut df = vec![0usize; vocabulary.len()];
        for counts in &doc_counts {
            for &(col, _) in counts {
                df[col] += 1;
            }
        }
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n_docs as f64) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let vectorizer = Self {
            options: options.clone(),
            tokenizer,
            vocabulary,
            idf,
        };

        let mut data = Array2::<f64>::zeros((n_docs, vectorizer.vocabulary.len()));
        for (i, counts) in doc_counts.iter().enumerate() {
            let row = vectorizer.weight_row(counts, doc_lengths[i]);
            data.row_mut(i).assign(&row);
        }

        tracing::debug!(
            documents = n_docs,
            terms = vectorizer.vocabulary.len(),
            "fitted tf-idf vectorizer"
        );

        Ok((vectorizer, TermWeightMatrix::from_array(data)))
    }

    /// Weight a new text against the fitted vocabulary. Terms the corpus never
    /// contained are ignored, so the result may be an all-zero row.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let tokens = self.tokenizer.tokenize(text);
        let mut counts: Vec<(usize, usize)> = Vec::new();
        for token in &tokens {
            if let Some(col) = self.vocabulary.index_of(token) {
                match counts.iter_mut().find(|(c, _)| *c == col) {
                    Some(entry) => entry.1 += 1,
                    None => counts.push((col, 1)),
                }
            }
        }
        self.weight_row(&counts, tokens.len())
    }

    fn weight_row(&self, counts: &[(usize, usize)], doc_len: usize) -> Array1<f64> {
        let mut row = Array1::<f64>::zeros(self.vocabulary.len());
        for &(col, count) in counts {
            let tf = match self.options.term_frequency {
                TermFrequency::Raw => count as f64,
                TermFrequency::LengthNormalized => count as f64 / doc_len.max(1) as f64,
            };
            row[col] = tf * self.idf[col];
        }

        if self.options.normalize {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }
        row
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// IDF weight per vocabulary column
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn options(&self) -> &VectorizerOptions {
        &self.options
    }
}

/// Vectorize a corpus into its TF-IDF matrix and vocabulary.
///
/// Fails with [`PipelineError::EmptyVocabulary`] when no document keeps a
/// single token after tokenization (an empty corpus included).
pub fn vectorize<S: AsRef<str>>(
    documents: &[S],
    options: &VectorizerOptions,
) -> Result<(TermWeightMatrix, Vocabulary)> {
    let (vectorizer, matrix) = Vectorizer::fit(documents, options)?;
    Ok((matrix, vectorizer.vocabulary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_stop_words() -> VectorizerOptions {
        VectorizerOptions {
            stop_words: StopWords::None,
            min_token_len: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_vocabulary_first_appearance_order() {
        let docs = ["beta alpha", "gamma alpha beta"];
        let (_, vocab) = vectorize(&docs, &no_stop_words()).unwrap();
        assert_eq!(vocab.terms(), &["beta", "alpha", "gamma"]);
        assert_eq!(vocab.index_of("gamma"), Some(2));
        assert_eq!(vocab.term(1), Some("alpha"));
        assert_eq!(vocab.index_of("delta"), None);
    }

    #[test]
    fn test_idf_formula() {
        let docs = ["apple banana", "apple cherry", "apple"];
        let (vectorizer, _) = Vectorizer::fit(&docs, &no_stop_words()).unwrap();
        let idf = vectorizer.idf();

        // apple in every document: ln(4/4) + 1
        assert!((idf[0] - 1.0).abs() < 1e-12);
        // banana in one document: ln(4/2) + 1
        assert!((idf[1] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_unit_norm() {
        let docs = [
            "Deep learning methods for computer vision",
            "Quantum computing for chemical simulations",
            "Machine learning techniques in healthcare",
        ];
        let (matrix, _) = vectorize(&docs, &VectorizerOptions::default()).unwrap();
        for norm in matrix.row_norms() {
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_document_row_is_zero() {
        let docs = ["the of and", "solar energy"];
        let (matrix, vocab) = vectorize(&docs, &VectorizerOptions::default()).unwrap();
        assert_eq!(vocab.len(), 2);
        let norms = matrix.row_norms();
        assert_eq!(norms[0], 0.0);
        assert!((norms[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_vocabulary() {
        let docs = ["the and of", "is it"];
        let err = vectorize(&docs, &VectorizerOptions::default()).unwrap_err();
        assert_eq!(err, PipelineError::EmptyVocabulary);

        let empty: [&str; 0] = [];
        assert_eq!(
            vectorize(&empty, &VectorizerOptions::default()).unwrap_err(),
            PipelineError::EmptyVocabulary
        );
    }

    #[test]
    fn test_raw_counts_without_normalization() {
        let options = VectorizerOptions {
            normalize: false,
            ..no_stop_words()
        };
        let docs = ["red red blue", "blue"];
        let (matrix, _) = vectorize(&docs, &options).unwrap();
        let idf_red = (3.0f64 / 2.0).ln() + 1.0;
        assert!((matrix.get(0, 0) - 2.0 * idf_red).abs() < 1e-12);
        assert!((matrix.get(1, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_normalized_tf() {
        let options = VectorizerOptions {
            normalize: false,
            term_frequency: TermFrequency::LengthNormalized,
            ..no_stop_words()
        };
        let docs = ["red red blue blue", "green"];
        let (matrix, _) = vectorize(&docs, &options).unwrap();
        let idf = (3.0f64 / 2.0).ln() + 1.0;
        assert!((matrix.get(0, 0) - 0.5 * idf).abs() < 1e-12);
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let docs = ["solar energy", "wind energy"];
        let (vectorizer, matrix) = Vectorizer::fit(&docs, &VectorizerOptions::default()).unwrap();

        let row = vectorizer.transform("Solar energy");
        assert_eq!(row, matrix.row(0).to_owned());

        let unknown = vectorizer.transform("quantum chemistry");
        assert!(unknown.iter().all(|&v| v == 0.0));
    }
}
