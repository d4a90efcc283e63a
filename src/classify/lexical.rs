//! Offline zero-shot baseline based on term overlap

use super::{Classification, ClassifierError, ZeroShotClassifier};
use crate::error::PipelineError;
use crate::vectorize::{Vectorizer, VectorizerOptions};
use async_trait::async_trait;

/// Softmax temperature applied to cosine similarities
const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Scores each label by the TF-IDF cosine similarity between the document
/// and the label text, fitted on the document plus all labels, then turns the
/// similarities into confidences with a softmax. Labels sharing no term with
/// the document all get the same low score.
#[derive(Debug, Clone)]
pub struct LexicalClassifier {
    options: VectorizerOptions,
    temperature: f64,
}

impl Default for LexicalClassifier {
    fn default() -> Self {
        Self::new(VectorizerOptions::default(), DEFAULT_TEMPERATURE)
    }
}

impl LexicalClassifier {
    pub fn new(options: VectorizerOptions, temperature: f64) -> Self {
        Self {
            options,
            temperature,
        }
    }

    /// Synchronous scoring shared by the async trait method
    pub fn scores(&self, document: &str, labels: &[String]) -> Vec<f64> {
        let mut corpus: Vec<&str> = Vec::with_capacity(labels.len() + 1);
        corpus.push(document);
        corpus.extend(labels.iter().map(String::as_str));

        let similarities: Vec<f64> = match Vectorizer::fit(&corpus[..], &self.options) {
            Ok((_, matrix)) => {
                let doc = matrix.row(0);
                (1..=labels.len()).map(|i| doc.dot(&matrix.row(i))).collect()
            }
            Err(PipelineError::EmptyVocabulary) => vec![0.0; labels.len()],
            Err(e) => {
                tracing::warn!("lexical classifier fell back to uniform scores: {}", e);
                vec![0.0; labels.len()]
            }
        };

        softmax(&similarities, self.temperature)
    }
}

fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    let t = if temperature > 0.0 { temperature } else { DEFAULT_TEMPERATURE };
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| ((v - max) / t).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

#[async_trait]
impl ZeroShotClassifier for LexicalClassifier {
    async fn classify(
        &self,
        document: &str,
        labels: &[String],
    ) -> Result<Classification, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::NoCandidateLabels);
        }
        Ok(Classification::from_scores(labels, &self.scores(document, labels)))
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec![
            "Technology and Innovation".to_string(),
            "Health and Wellness".to_string(),
            "Financial and Economic".to_string(),
        ]
    }

    #[test]
    fn test_scores_sum_to_one() {
        let classifier = LexicalClassifier::default();
        let scores = classifier.scores("Regular exercise improves health", &labels());
        assert_eq!(scores.len(), 3);
        assert!((scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(scores[1] > scores[0]);
        assert!(scores[1] > scores[2]);
    }

    #[test]
    fn test_no_overlap_is_uniform() {
        let classifier = LexicalClassifier::default();
        let scores = classifier.scores("the of and", &labels());
        for s in scores {
            assert!((s - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_classify_ranks_matching_label_first() {
        let classifier = LexicalClassifier::default();
        let result = classifier
            .classify(
                "The stock market experienced a significant drop due to economic instability.",
                &labels(),
            )
            .await
            .unwrap();
        assert_eq!(result.top().unwrap().label, "Financial and Economic");
    }

    #[tokio::test]
    async fn test_no_labels() {
        let classifier = LexicalClassifier::default();
        let err = classifier.classify("anything", &[]).await.unwrap_err();
        assert!(matches!(err, ClassifierError::NoCandidateLabels));
    }
}
