//! Zero-shot classification collaborator
//!
//! The clustering core never depends on how inference is performed: it only
//! sees [`ZeroShotClassifier::classify`], which ranks a closed set of
//! candidate labels for one document. Two implementations ship with the crate:
//!
//! - [`LexicalClassifier`]: offline, TF-IDF cosine between document and label
//! - [`OllamaClassifier`]: asks a local Ollama model for per-label confidences
//!
//! Retries, caching and batching belong to the implementation, not to callers.

pub mod lexical;
pub mod ollama;

pub use lexical::LexicalClassifier;
pub use ollama::OllamaClassifier;

use crate::config::{ClassifierConfig, ClassifierProvider};
use async_trait::async_trait;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// Classifier errors
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("No candidate labels given")]
    NoCandidateLabels,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One candidate label with its confidence in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Candidate labels ranked by non-increasing confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Classification {
    ranked: Vec<LabelScore>,
}

impl Classification {
    /// Rank `labels` by `scores` (same order as `labels`). Scores are clamped
    /// to [0, 1]; equal scores keep the candidate order.
    pub fn from_scores(labels: &[String], scores: &[f64]) -> Self {
        let mut ranked: Vec<LabelScore> = labels
            .iter()
            .zip(scores.iter())
            .map(|(label, &score)| LabelScore {
                label: label.clone(),
                score: if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) },
            })
            .collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Self { ranked }
    }

    /// Highest-ranked label
    pub fn top(&self) -> Option<&LabelScore> {
        self.ranked.first()
    }

    pub fn ranked(&self) -> &[LabelScore] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Ranks candidate labels for a document
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Classify `document` against `labels`
    async fn classify(
        &self,
        document: &str,
        labels: &[String],
    ) -> Result<Classification, ClassifierError>;

    /// Short name for logs and reports
    fn name(&self) -> &str;
}

/// Create a classifier from configuration
pub fn create_classifier(config: &ClassifierConfig) -> Box<dyn ZeroShotClassifier> {
    match config.provider {
        ClassifierProvider::Lexical => Box::new(LexicalClassifier::default()),
        ClassifierProvider::Ollama => Box::new(OllamaClassifier::new(config.clone())),
    }
}
