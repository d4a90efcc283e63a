//! Quality measures for a fitted partition

use crate::matrix::squared_distance;
use ndarray::Array2;

/// Within-cluster sum of squared distances to the assigned centroid
pub fn inertia(data: &Array2<f64>, labels: &[usize], centroids: &Array2<f64>) -> f64 {
    labels
        .iter()
        .enumerate()
        .map(|(i, &c)| squared_distance(data.row(i), centroids.row(c)))
        .sum()
}

/// Mean silhouette coefficient over all documents.
///
/// Members of singleton clusters score 0. Returns 0 when fewer than two
/// clusters are populated.
pub fn silhouette(data: &Array2<f64>, labels: &[usize], k: usize) -> f64 {
    let n = labels.len();
    let mut sizes = vec![0usize; k];
    for &c in labels {
        sizes[c] += 1;
    }
    if n < 2 || sizes.iter().filter(|&&s| s > 0).count() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i];
        if sizes[own] < 2 {
            continue;
        }

        let mut sum_by_cluster = vec![0.0; k];
        for j in 0..n {
            if i != j {
                sum_by_cluster[labels[j]] += squared_distance(data.row(i), data.row(j)).sqrt();
            }
        }

        // a(i): mean distance to the rest of its own cluster
        let a = sum_by_cluster[own] / (sizes[own] - 1) as f64;
        // b(i): smallest mean distance to another populated cluster
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sum_by_cluster[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / n as f64
}
