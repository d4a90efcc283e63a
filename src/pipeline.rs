//! End-to-end run: documents → TF-IDF → (k-means ‖ PCA) → combined rows
//!
//! The matrix is built once and read by both stages; clustering and
//! projection run side by side on the rayon pool. Errors propagate unchanged
//! and nothing is retried.
//!
//! # Example
//!
//! ```
//! use docmap::pipeline::run;
//!
//! let docs = ["cat dog", "dog cat", "car engine"];
//! // The first two rows are identical, so only one principal axis exists
//! let output = run(&docs, 2, 1, 0).unwrap();
//! let labels = output.assignment.labels();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! assert_eq!(output.points.len(), 3);
//! ```

use crate::classify::{ClassifierError, ZeroShotClassifier};
use crate::cluster::{
    check_cluster_count, ClusterAssignment, ClusterEngine, KMeansModel, KMeansParams,
};
use crate::error::Result;
use crate::matrix::TermWeightMatrix;
use crate::reduce::{ProjectedPoint, Projection, Reducer, ReducerOptions};
use crate::vectorize::{Vectorizer, VectorizerOptions, Vocabulary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settings for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub vectorizer: VectorizerOptions,
    #[serde(default)]
    pub clustering: KMeansParams,
    #[serde(default)]
    pub projection: ReducerOptions,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Cluster id per document
    pub assignment: ClusterAssignment,
    /// Projected coordinates per document
    pub points: Vec<ProjectedPoint>,
    /// Fitted k-means model (centroids, iterations, objective)
    pub model: KMeansModel,
    /// Fitted PCA projection (axes, explained variance)
    pub projection: Projection,
    pub vocabulary: Vocabulary,
    pub matrix: TermWeightMatrix,
}

/// One output row: a document with its cluster and coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRow {
    pub document: usize,
    pub cluster: usize,
    pub coords: Vec<f64>,
}

/// Cluster name picked by the zero-shot classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterLabel {
    pub cluster: usize,
    pub label: String,
    pub score: f64,
    /// Document the label was inferred from
    pub representative: usize,
}

/// Serializable summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub documents: usize,
    pub vocabulary_size: usize,
    pub clusters: usize,
    pub cluster_sizes: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
    pub inertia: f64,
    pub silhouette: f64,
    pub explained_variance_ratio: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ClusterLabel>,
    pub rows: Vec<DocumentRow>,
}

impl PipelineOutput {
    /// Per-document rows in input order
    pub fn rows(&self) -> Vec<DocumentRow> {
        self.assignment
            .labels()
            .iter()
            .zip(self.points.iter())
            .enumerate()
            .map(|(document, (&cluster, point))| DocumentRow {
                document,
                cluster,
                coords: point.coords.clone(),
            })
            .collect()
    }

    /// Summary suitable for JSON output
    pub fn report(&self, labels: Vec<ClusterLabel>) -> PipelineReport {
        PipelineReport {
            generated_at: Utc::now(),
            documents: self.assignment.len(),
            vocabulary_size: self.vocabulary.len(),
            clusters: self.model.n_clusters(),
            cluster_sizes: self.model.cluster_sizes(),
            iterations: self.model.iterations,
            converged: self.model.converged,
            inertia: self.model.inertia,
            silhouette: self.model.silhouette(&self.matrix),
            explained_variance_ratio: self.projection.explained_variance_ratio.clone(),
            labels,
            rows: self.rows(),
        }
    }
}

/// Vectorizer → ClusterEngine + Reducer
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Cluster and project `documents`.
    ///
    /// The cluster count is checked before anything is vectorized. When both
    /// stages fail, the clustering error is the one returned.
    pub fn run<S: AsRef<str>>(&self, documents: &[S]) -> Result<PipelineOutput> {
        check_cluster_count(self.config.clustering.clusters, documents.len())?;

        let (vectorizer, matrix) = Vectorizer::fit(documents, &self.config.vectorizer)?;

        let engine = ClusterEngine::new(self.config.clustering.clone());
        let reducer = Reducer::new(self.config.projection.clone());
        let (model, projection) = rayon::join(|| engine.fit(&matrix), || reducer.fit(&matrix));
        let model = model?;
        let projection = projection?;

        tracing::info!(
            documents = documents.len(),
            terms = matrix.n_terms(),
            clusters = model.n_clusters(),
            iterations = model.iterations,
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            assignment: model.assignment.clone(),
            points: projection.points.clone(),
            model,
            projection,
            vocabulary: vectorizer.vocabulary().clone(),
            matrix,
        })
    }
}

/// Run the pipeline with default vectorizer settings
pub fn run<S: AsRef<str>>(
    documents: &[S],
    k: usize,
    components: usize,
    seed: u64,
) -> Result<PipelineOutput> {
    Pipeline::new(PipelineConfig {
        vectorizer: VectorizerOptions::default(),
        clustering: KMeansParams::new(k, seed),
        projection: ReducerOptions { components },
    })
    .run(documents)
}

/// Name every populated cluster after the top label of its representative
/// document (the member closest to the centroid).
pub async fn label_clusters<S: AsRef<str>>(
    classifier: &dyn ZeroShotClassifier,
    documents: &[S],
    output: &PipelineOutput,
    labels: &[String],
) -> std::result::Result<Vec<ClusterLabel>, ClassifierError> {
    let mut named = Vec::new();

    for cluster in 0..output.model.n_clusters() {
        let Some(representative) = output.model.representative(&output.matrix, cluster) else {
            continue;
        };
        let Some(document) = documents.get(representative) else {
            continue;
        };

        let classification = classifier.classify(document.as_ref(), labels).await?;
        if let Some(top) = classification.top() {
            tracing::debug!(
                cluster,
                classifier = classifier.name(),
                "labelled cluster as {:?} ({:.3})",
                top.label,
                top.score
            );
            named.push(ClusterLabel {
                cluster,
                label: top.label.clone(),
                score: top.score,
                representative,
            });
        }
    }

    Ok(named)
}
