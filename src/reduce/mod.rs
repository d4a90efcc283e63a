//! Principal component projection of the term-weight matrix
//!
//! The matrix is column-centered and decomposed through whichever of the two
//! scatter matrices is smaller:
//! - `XᵀX` (terms × terms) when there are at least as many documents as terms
//! - `XXᵀ` (documents × documents) otherwise, mapping each eigenvector back
//!   with `v = Xᵀu / √λ`
//!
//! Both routes yield the same principal axes. Each axis is oriented so that
//! its largest-magnitude entry is positive.

use crate::error::{PipelineError, Result};
use crate::matrix::TermWeightMatrix;
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default projection dimensionality
pub const DEFAULT_COMPONENTS: usize = 2;

/// Eigenvalues below this fraction of the largest one (or of 1.0) count as zero
const RANK_TOLERANCE: f64 = 1e-10;

/// Coordinates of one document in the projected space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub coords: Vec<f64>,
}

impl ProjectedPoint {
    /// First principal coordinate
    pub fn x(&self) -> f64 {
        self.coords.first().copied().unwrap_or(0.0)
    }

    /// Second principal coordinate (0.0 for a one-component projection)
    pub fn y(&self) -> f64 {
        self.coords.get(1).copied().unwrap_or(0.0)
    }

    pub fn dimensions(&self) -> usize {
        self.coords.len()
    }
}

/// A fitted PCA projection
#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    /// One point per document, in input order
    pub points: Vec<ProjectedPoint>,
    /// Principal axes as rows (components × terms), unit norm, orthogonal
    #[serde(skip)]
    pub components: Array2<f64>,
    /// Variance captured by each axis
    pub explained_variance: Vec<f64>,
    /// Share of the total variance captured by each axis
    pub explained_variance_ratio: Vec<f64>,
    /// Column means removed before projecting
    #[serde(skip)]
    pub mean: Array1<f64>,
}

/// Projection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducerOptions {
    #[serde(default = "default_components")]
    pub components: usize,
}

fn default_components() -> usize {
    DEFAULT_COMPONENTS
}

impl Default for ReducerOptions {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS,
        }
    }
}

/// PCA reducer
#[derive(Debug, Clone, Default)]
pub struct Reducer {
    options: ReducerOptions,
}

impl Reducer {
    pub fn new(options: ReducerOptions) -> Self {
        Self { options }
    }

    pub fn fit(&self, matrix: &TermWeightMatrix) -> Result<Projection> {
        let requested = self.options.components;
        if requested == 0 {
            return Err(PipelineError::InvalidParameter(
                "components must be greater than 0".to_string(),
            ));
        }

        let data = matrix.as_array();
        let (n, d) = data.dim();
        if n == 0 || d == 0 {
            return Err(PipelineError::InsufficientRank { requested, rank: 0 });
        }

        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(d));
        let centered = data - &mean;

        let (eigenvalues, axes) = principal_axes(&centered);

        let largest = eigenvalues.first().copied().unwrap_or(0.0).max(0.0);
        let tolerance = RANK_TOLERANCE * largest.max(1.0);
        let rank = eigenvalues.iter().filter(|&&l| l > tolerance).count();
        if rank < requested {
            return Err(PipelineError::InsufficientRank { requested, rank });
        }

        let mut components = Array2::<f64>::zeros((requested, d));
        for c in 0..requested {
            let mut axis = axes.column(c).to_owned();
            let norm = axis.dot(&axis).sqrt();
            if norm > 0.0 {
                axis.mapv_inplace(|v| v / norm);
            }
            orient(&mut axis);
            components.row_mut(c).assign(&axis);
        }

        let scores = centered.dot(&components.t());
        let points = scores
            .outer_iter()
            .map(|row| ProjectedPoint {
                coords: row.to_vec(),
            })
            .collect();

        // n >= 2 here: a single centered row has rank 0
        let dof = (n - 1) as f64;
        let total_variance = centered.iter().map(|x| x * x).sum::<f64>() / dof;
        let explained_variance: Vec<f64> =
            eigenvalues[..requested].iter().map(|l| l / dof).collect();
        let explained_variance_ratio = explained_variance
            .iter()
            .map(|v| if total_variance > 0.0 { v / total_variance } else { 0.0 })
            .collect();

        tracing::debug!(
            documents = n,
            terms = d,
            rank,
            components = requested,
            "fitted pca projection"
        );

        Ok(Projection {
            points,
            components,
            explained_variance,
            explained_variance_ratio,
            mean,
        })
    }
}

/// Project `matrix` onto its top `components` principal axes
pub fn reduce(matrix: &TermWeightMatrix, components: usize) -> Result<Projection> {
    Reducer::new(ReducerOptions { components }).fit(matrix)
}

/// Eigenvalues of `XᵀX` in descending order and the matching axes as
/// columns (terms × m) of a centered matrix `X`.
fn principal_axes(centered: &Array2<f64>) -> (Vec<f64>, Array2<f64>) {
    let (n, d) = centered.dim();
    if d <= n {
        let scatter = centered.t().dot(centered);
        return symmetric_eigen(&scatter);
    }

    let gram = centered.dot(&centered.t());
    let (values, left) = symmetric_eigen(&gram);
    let mut axes = Array2::<f64>::zeros((d, values.len()));
    for (i, &lambda) in values.iter().enumerate() {
        if lambda <= 0.0 {
            continue;
        }
        let axis = centered.t().dot(&left.column(i)) / lambda.sqrt();
        axes.column_mut(i).assign(&axis);
    }
    (values, axes)
}

/// Eigen-decomposition of a symmetric matrix: eigenvalues in descending
/// order (stable on ties) and the matching unit eigenvectors as columns.
fn symmetric_eigen(matrix: &Array2<f64>) -> (Vec<f64>, Array2<f64>) {
    let m = matrix.nrows();
    let eigen = SymmetricEigen::new(DMatrix::from_fn(m, m, |i, j| matrix[[i, j]]));

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let vectors = Array2::from_shape_fn((m, m), |(row, col)| {
        eigen.eigenvectors[(row, order[col])]
    });
    (values, vectors)
}

/// Flip `axis` so its largest-magnitude entry (first one on ties) is positive
fn orient(axis: &mut Array1<f64>) {
    let mut pivot = 0;
    for (i, v) in axis.iter().enumerate() {
        if v.abs() > axis[pivot].abs() {
            pivot = i;
        }
    }
    if axis[pivot] < 0.0 {
        axis.mapv_inplace(|v| -v);
    }
}
