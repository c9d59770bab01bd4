//! Dense scaled distance matrix.

use crate::error::{Result, RoutingError};
use crate::evaluation::Scale;

/// A dense n×n distance matrix stored in row-major order, in scaled units.
///
/// The matrix is not required to be symmetric and the triangle inequality is
/// not assumed. The diagonal is always zero.
///
/// # Examples
///
/// ```
/// use u_fleet::distance::DistanceMatrix;
/// use u_fleet::evaluation::Scale;
///
/// let rows = vec![
///     vec![0.0, 2.5, 4.0],
///     vec![3.0, 0.0, 1.5],
///     vec![4.0, 1.5, 0.0],
/// ];
/// let dm = DistanceMatrix::from_rows(&rows, Scale::DEFAULT).unwrap();
/// assert_eq!(dm.get(0, 1), 2_500);
/// assert_eq!(dm.get(1, 0), 3_000);
/// assert_eq!(dm.size(), 3);
/// assert!(!dm.is_symmetric());
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<i64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Scales and validates an explicit n×n grid of real distances.
    ///
    /// Fails with [`RoutingError::InvalidInstance`] if the grid is not square,
    /// holds a negative or non-finite value, or has a non-zero diagonal.
    pub fn from_rows(rows: &[Vec<f64>], scale: Scale) -> Result<Self> {
        let size = rows.len();
        let mut dm = Self::new(size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(RoutingError::invalid(format!(
                    "distance matrix is not square: row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(RoutingError::invalid(format!(
                        "distance ({i}, {j}) must be finite and non-negative, got {d}"
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(RoutingError::invalid(format!(
                        "distance ({i}, {i}) must be zero, got {d}"
                    )));
                }
                dm.set(i, j, scale.to_fixed(d)?);
            }
        }
        Ok(dm)
    }

    /// Returns the scaled distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the scaled distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: i64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest entry, zero for an empty matrix.
    pub fn max_entry(&self) -> i64 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 5.0, 8.0],
            vec![5.0, 0.0, 3.5],
            vec![8.0, 3.5, 0.0],
        ]
    }

    #[test]
    fn test_from_rows() {
        let dm = DistanceMatrix::from_rows(&rows(), Scale::DEFAULT).expect("valid");
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.get(0, 1), 5_000);
        assert_eq!(dm.get(1, 2), 3_500);
        assert_eq!(dm.get(0, 0), 0);
        assert_eq!(dm.max_entry(), 8_000);
        assert!(dm.is_symmetric());
    }

    #[test]
    fn test_not_square() {
        let mut r = rows();
        r[1].pop();
        let err = DistanceMatrix::from_rows(&r, Scale::DEFAULT).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_negative_and_nan() {
        let mut r = rows();
        r[0][2] = -1.0;
        assert!(DistanceMatrix::from_rows(&r, Scale::DEFAULT).is_err());
        let mut r = rows();
        r[2][0] = f64::NAN;
        assert!(DistanceMatrix::from_rows(&r, Scale::DEFAULT).is_err());
    }

    #[test]
    fn test_non_zero_diagonal() {
        let mut r = rows();
        r[1][1] = 0.5;
        assert!(DistanceMatrix::from_rows(&r, Scale::DEFAULT)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10);
        dm.set(1, 0, 15);
        assert!(!dm.is_symmetric());
    }
}
