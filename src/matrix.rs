//! Dense document × term weight matrix shared (read-only) by the clustering
//! and projection stages.

use ndarray::{Array2, ArrayView1, Axis};

/// Row i holds the weights of document i; column j belongs to vocabulary
/// term j.
#[derive(Debug, Clone, PartialEq)]
pub struct TermWeightMatrix {
    data: Array2<f64>,
}

impl TermWeightMatrix {
    /// Wrap an existing array (rows = documents)
    pub fn from_array(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Build from row vectors; every row must have the same length
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_cols) {
            return None;
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((rows.len(), n_cols), flat)
            .ok()
            .map(Self::from_array)
    }

    pub fn n_documents(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_terms(&self) -> usize {
        self.data.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    pub fn get(&self, document: usize, term: usize) -> f64 {
        self.data[[document, term]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Euclidean norm of every row
    pub fn row_norms(&self) -> Vec<f64> {
        self.data
            .axis_iter(Axis(0))
            .map(|row| row.dot(&row).sqrt())
            .collect()
    }
}

/// Squared Euclidean distance between two equally long vectors
pub fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = TermWeightMatrix::from_rows(&[vec![3.0, 4.0], vec![0.0, 0.0]]).unwrap();
        assert_eq!(m.n_documents(), 2);
        assert_eq!(m.n_terms(), 2);
        assert_eq!(m.get(0, 1), 4.0);
        assert_eq!(m.row_norms(), vec![5.0, 0.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(TermWeightMatrix::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_none());
    }

    #[test]
    fn test_squared_distance() {
        let m = TermWeightMatrix::from_rows(&[vec![1.0, 1.0], vec![4.0, 5.0]]).unwrap();
        assert_eq!(squared_distance(m.row(0), m.row(1)), 25.0);
    }
}
