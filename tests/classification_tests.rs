//! Zero-shot classification contract and post-hoc cluster labelling
//!
//! Uses the offline lexical classifier plus a scripted stand-in so no model
//! server is needed.

use async_trait::async_trait;
use docmap::classify::{
    create_classifier, Classification, ClassifierError, LexicalClassifier, ZeroShotClassifier,
};
use docmap::config::ClassifierConfig;
use docmap::pipeline::{label_clusters, run};
use std::sync::atomic::{AtomicUsize, Ordering};

fn categories() -> Vec<String> {
    vec![
        "Technology and Innovation".to_string(),
        "Health and Wellness".to_string(),
        "Financial and Economic".to_string(),
    ]
}

/// Always prefers the last label and counts how often it was asked
struct LastLabelClassifier {
    calls: AtomicUsize,
}

#[async_trait]
impl ZeroShotClassifier for LastLabelClassifier {
    async fn classify(
        &self,
        _document: &str,
        labels: &[String],
    ) -> Result<Classification, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scores: Vec<f64> = (0..labels.len())
            .map(|i| (i + 1) as f64 / labels.len() as f64)
            .collect();
        Ok(Classification::from_scores(labels, &scores))
    }

    fn name(&self) -> &str {
        "last-label"
    }
}

/// Fails every request
struct UnreachableClassifier;

#[async_trait]
impl ZeroShotClassifier for UnreachableClassifier {
    async fn classify(
        &self,
        _document: &str,
        _labels: &[String],
    ) -> Result<Classification, ClassifierError> {
        Err(ClassifierError::ConnectionError("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

#[tokio::test]
async fn test_lexical_ranking_contract() {
    let classifier = LexicalClassifier::default();
    let paragraphs = [
        "Eating a balanced diet and exercising regularly are key to maintaining good health.",
        "The stock market experienced a significant drop due to economic instability.",
    ];

    for paragraph in paragraphs {
        let result = classifier.classify(paragraph, &categories()).await.unwrap();
        assert_eq!(result.len(), 3);

        let scores: Vec<f64> = result.ranked().iter().map(|s| s.score).collect();
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    let health = classifier.classify(paragraphs[0], &categories()).await.unwrap();
    assert_eq!(health.top().unwrap().label, "Health and Wellness");
}

#[tokio::test]
async fn test_default_config_builds_lexical_classifier() {
    let classifier = create_classifier(&ClassifierConfig::default());
    let result = classifier
        .classify("New AI model improves prediction technology", &categories())
        .await
        .unwrap();
    assert_eq!(result.top().unwrap().label, "Technology and Innovation");
}

#[tokio::test]
async fn test_label_clusters_uses_top_label_once_per_cluster() {
    let docs = [
        "solar panels renewable energy",
        "renewable energy wind turbines",
        "football league match",
        "league match goals football",
    ];
    let output = run(&docs, 2, 1, 11).unwrap();

    let classifier = LastLabelClassifier {
        calls: AtomicUsize::new(0),
    };
    let named = label_clusters(&classifier, &docs, &output, &categories())
        .await
        .unwrap();

    let populated = output.model.cluster_sizes().iter().filter(|&&s| s > 0).count();
    assert_eq!(named.len(), populated);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), populated);
    for item in &named {
        assert_eq!(item.label, "Financial and Economic");
        assert!((item.score - 1.0).abs() < 1e-12);
        assert!(output.model.members(item.cluster).contains(&item.representative));
    }
}

#[tokio::test]
async fn test_classifier_errors_propagate() {
    let docs = ["alpha beta", "gamma delta"];
    let output = run(&docs, 1, 1, 0).unwrap();

    let err = label_clusters(&UnreachableClassifier, &docs, &output, &categories())
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifierError::ConnectionError(_)));
}
