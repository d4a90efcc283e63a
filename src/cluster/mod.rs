//! K-means clustering over TF-IDF rows
//!
//! Lloyd iterations with a seeded initialization. The assignment step runs in
//! parallel per document; the update step is a sequential reduction that acts
//! as the barrier before the next assignment.
//!
//! Tie-breaks are fixed so a run is fully determined by (matrix, k, seed):
//! - a document equidistant to several centroids goes to the lowest cluster id
//! - an emptied cluster is reseeded on the document farthest from its own
//!   centroid, lowest document index first; it stays empty when every
//!   candidate already sits on its centroid (fewer distinct rows than k)

pub mod metrics;

use crate::error::{PipelineError, Result};
use crate::matrix::{squared_distance, TermWeightMatrix};
use ndarray::{Array2, ArrayView1};
use rand::{seq::index, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// How the first k centroids are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    /// k distinct document rows sampled uniformly
    #[default]
    Random,
    /// k-means++ (distance-squared weighted sampling)
    PlusPlus,
}

/// K-means settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansParams {
    /// Number of clusters (k)
    pub clusters: usize,

    /// Seed of the initialization PRNG
    #[serde(default)]
    pub seed: u64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default)]
    pub init: InitStrategy,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            clusters: 3,
            seed: 42,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            init: InitStrategy::Random,
        }
    }
}

impl KMeansParams {
    pub fn new(clusters: usize, seed: u64) -> Self {
        Self {
            clusters,
            seed,
            ..Default::default()
        }
    }
}

/// Cluster id per document, indexed by document position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterAssignment(Vec<usize>);

impl ClusterAssignment {
    pub fn labels(&self) -> &[usize] {
        &self.0
    }

    pub fn cluster_of(&self, document: usize) -> Option<usize> {
        self.0.get(document).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a k-means run
#[derive(Debug, Clone, Serialize)]
pub struct KMeansModel {
    /// Cluster id per document
    pub assignment: ClusterAssignment,
    /// One centroid per row (k × terms)
    #[serde(skip)]
    pub centroids: Array2<f64>,
    /// Number of assignment steps performed
    pub iterations: usize,
    /// False when the iteration cap stopped the run
    pub converged: bool,
    /// Objective measured after every assignment step
    pub objective_history: Vec<f64>,
    /// Within-cluster sum of squares for the final centroids
    pub inertia: f64,
}

impl KMeansModel {
    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    /// Nearest centroid for a vector in the same term space
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> Result<usize> {
        if row.len() != self.centroids.ncols() {
            return Err(PipelineError::InvalidParameter(format!(
                "vector has {} terms, centroids have {}",
                row.len(),
                self.centroids.ncols()
            )));
        }
        Ok(nearest_centroid(row, &self.centroids).0)
    }

    /// Number of documents per cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters()];
        for &label in self.assignment.labels() {
            sizes[label] += 1;
        }
        sizes
    }

    /// Document indices of one cluster, ascending
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.assignment
            .labels()
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Member closest to the cluster centroid (lowest index on ties)
    pub fn representative(&self, matrix: &TermWeightMatrix, cluster: usize) -> Option<usize> {
        if cluster >= self.n_clusters() {
            return None;
        }
        let centroid = self.centroids.row(cluster);
        let mut best: Option<(usize, f64)> = None;
        for i in self.members(cluster) {
            let d = squared_distance(matrix.row(i), centroid);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Mean silhouette coefficient of the partition
    pub fn silhouette(&self, matrix: &TermWeightMatrix) -> f64 {
        metrics::silhouette(matrix.as_array(), self.assignment.labels(), self.n_clusters())
    }
}

/// K-means engine configured with [`KMeansParams`]
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    params: KMeansParams,
}

impl ClusterEngine {
    pub fn new(params: KMeansParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KMeansParams {
        &self.params
    }

    /// Partition the rows of `matrix` into `params.clusters` groups
    pub fn fit(&self, matrix: &TermWeightMatrix) -> Result<KMeansModel> {
        let n = matrix.n_documents();
        let k = self.params.clusters;
        check_cluster_count(k, n)?;
        if self.params.max_iterations == 0 {
            return Err(PipelineError::InvalidParameter(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        let data = matrix.as_array();
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut centroids = match self.params.init {
            InitStrategy::Random => init_random(data, k, &mut rng),
            InitStrategy::PlusPlus => init_plus_plus(data, k, &mut rng),
        };

        // usize::MAX marks "not yet assigned" so the first pass always counts as a change
        let mut labels = vec![usize::MAX; n];
        let mut distances = vec![0.0; n];
        let mut objective_history = Vec::new();
        let mut iterations = 0;
        let mut converged = false;
        let mut reseeded = false;

        while iterations < self.params.max_iterations {
            iterations += 1;

            let changed = assign(data, &centroids, &mut labels, &mut distances);
            objective_history.push(distances.iter().sum());

            if changed == 0 && !reseeded {
                converged = true;
                break;
            }

            reseeded = update(data, &labels, &distances, &mut centroids);
        }

        let inertia = metrics::inertia(data, &labels, &centroids);

        if converged {
            tracing::debug!(k, iterations, inertia, "k-means converged");
        } else {
            tracing::warn!(
                k,
                iterations,
                inertia,
                "k-means stopped at the iteration cap without converging"
            );
        }

        Ok(KMeansModel {
            assignment: ClusterAssignment(labels),
            centroids,
            iterations,
            converged,
            objective_history,
            inertia,
        })
    }
}

/// Cluster `matrix` into `k` groups with default settings and the given seed
pub fn cluster(matrix: &TermWeightMatrix, k: usize, seed: u64) -> Result<KMeansModel> {
    ClusterEngine::new(KMeansParams::new(k, seed)).fit(matrix)
}

/// `1 <= k <= documents`
pub fn check_cluster_count(k: usize, documents: usize) -> Result<()> {
    if k == 0 || k > documents {
        return Err(PipelineError::InvalidClusterCount { k, documents });
    }
    Ok(())
}

fn init_random(data: &Array2<f64>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
    let mut centroids = Array2::zeros((k, data.ncols()));
    for (c, doc) in index::sample(rng, data.nrows(), k).into_iter().enumerate() {
        centroids.row_mut(c).assign(&data.row(doc));
    }
    centroids
}

fn init_plus_plus(data: &Array2<f64>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
    let n = data.nrows();
    let mut chosen = Vec::with_capacity(k);
    chosen.push(rng.gen_range(0..n));

    let mut closest: Vec<f64> = (0..n)
        .map(|i| squared_distance(data.row(i), data.row(chosen[0])))
        .collect();

    while chosen.len() < k {
        let total: f64 = closest.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            let mut pick = None;
            for (i, &w) in closest.iter().enumerate() {
                if w <= 0.0 {
                    continue;
                }
                acc += w;
                pick = Some(i);
                if acc > target {
                    break;
                }
            }
            pick
        } else {
            None
        };

        // Every remaining row coincides with a chosen one: take the lowest unused index
        let next = next.unwrap_or_else(|| (0..n).find(|i| !chosen.contains(i)).unwrap_or(0));
        chosen.push(next);

        for (i, best) in closest.iter_mut().enumerate() {
            let d = squared_distance(data.row(i), data.row(next));
            if d < *best {
                *best = d;
            }
        }
    }

    let mut centroids = Array2::zeros((k, data.ncols()));
    for (c, &doc) in chosen.iter().enumerate() {
        centroids.row_mut(c).assign(&data.row(doc));
    }
    centroids
}

/// Nearest centroid and its squared distance; strict `<` keeps the lowest id on ties
fn nearest_centroid(row: ArrayView1<'_, f64>, centroids: &Array2<f64>) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.outer_iter().enumerate() {
        let d = squared_distance(row, centroid);
        if d < best_dist {
            best = c;
            best_dist = d;
        }
    }
    (best, best_dist)
}

/// Assignment step. Returns how many documents changed cluster.
fn assign(
    data: &Array2<f64>,
    centroids: &Array2<f64>,
    labels: &mut [usize],
    distances: &mut [f64],
) -> usize {
    let nearest: Vec<(usize, f64)> = (0..data.nrows())
        .into_par_iter()
        .map(|i| nearest_centroid(data.row(i), centroids))
        .collect();

    let mut changed = 0;
    for (i, (label, dist)) in nearest.into_iter().enumerate() {
        if labels[i] != label {
            labels[i] = label;
            changed += 1;
        }
        distances[i] = dist;
    }
    changed
}

/// Update step: centroids become member means; empty clusters are reseeded.
/// Returns true if any cluster had to be reseeded.
fn update(
    data: &Array2<f64>,
    labels: &[usize],
    distances: &[f64],
    centroids: &mut Array2<f64>,
) -> bool {
    let k = centroids.nrows();
    let mut sums = Array2::<f64>::zeros((k, data.ncols()));
    let mut counts = vec![0usize; k];
    for (i, &c) in labels.iter().enumerate() {
        let mut sum = sums.row_mut(c);
        sum += &data.row(i);
        counts[c] += 1;
    }

    let mut taken = vec![false; labels.len()];
    let mut reseeded = false;
    for c in 0..k {
        if counts[c] > 0 {
            let mean = &sums.row(c) / counts[c] as f64;
            centroids.row_mut(c).assign(&mean);
            continue;
        }

        let mut farthest: Option<(usize, f64)> = None;
        for (i, &d) in distances.iter().enumerate() {
            if taken[i] {
                continue;
            }
            match farthest {
                Some((_, fd)) if d <= fd => {}
                _ => farthest = Some((i, d)),
            }
        }

        match farthest {
            Some((doc, dist)) if dist > 0.0 => {
                tracing::debug!(cluster = c, document = doc, dist, "reseeding empty cluster");
                taken[doc] = true;
                centroids.row_mut(c).assign(&data.row(doc));
                reseeded = true;
            }
            // Every remaining document sits on its centroid: fewer distinct rows than k
            _ => tracing::debug!(cluster = c, "empty cluster has no document to reseed from"),
        }
    }
    reseeded
}
