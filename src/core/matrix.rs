//! Exact integer matrix operations
//!
//! Products are checked: leaving the `i64` range is reported as
//! [`LatticeError::IntegerOverflow`] rather than silently wrapping. Rank and
//! determinant are computed over big integers and never overflow internally.

use crate::core::error::{LatticeError, Result};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// Matrix represented as a vector of vectors (row-major)
///
/// Lattice bases store their basis vectors as *columns*, so `get(i, j)` is
/// the i-th coordinate of the j-th basis vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRows", into = "MatrixRows")]
pub struct Matrix {
    data: Vec<Vec<i64>>,
    rows: usize,
    cols: usize,
}

/// On-disk form of a matrix: `{"rows": [[..], ..]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixRows {
    pub rows: Vec<Vec<i64>>,
}

impl TryFrom<MatrixRows> for Matrix {
    type Error = LatticeError;

    fn try_from(value: MatrixRows) -> Result<Self> {
        Matrix::new(value.rows)
    }
}

impl From<Matrix> for MatrixRows {
    fn from(value: Matrix) -> Self {
        MatrixRows { rows: value.data }
    }
}

fn overflow(op: &str) -> LatticeError {
    LatticeError::integer_overflow(format!("{} exceeds i64 range", op))
}

impl Matrix {
    /// Create a new matrix from 2D vector
    pub fn new(data: Vec<Vec<i64>>) -> Result<Self> {
        if data.is_empty() || data[0].is_empty() {
            return Err(LatticeError::invalid_parameters("Matrix cannot be empty"));
        }

        let rows = data.len();
        let cols = data[0].len();

        for row in data.iter() {
            if row.len() != cols {
                return Err(LatticeError::dimension_mismatch(
                    (rows, cols),
                    (rows, row.len()),
                ));
            }
        }

        Ok(Matrix { data, rows, cols })
    }

    /// Create a matrix from real rows whose entries are all integers
    pub fn from_f64_rows(data: Vec<Vec<f64>>) -> Result<Self> {
        let mut converted = Vec::with_capacity(data.len());
        for (i, row) in data.iter().enumerate() {
            let mut out = Vec::with_capacity(row.len());
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(LatticeError::invalid_parameters(format!(
                        "entry ({}, {}) = {} is not an integer",
                        i, j, v
                    )));
                }
                if v < i64::MIN as f64 || v >= i64::MAX as f64 {
                    return Err(overflow("matrix entry"));
                }
                out.push(v as i64);
            }
            converted.push(out);
        }
        Matrix::new(converted)
    }

    /// Create an identity matrix
    pub fn identity(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(LatticeError::invalid_parameters("Dimension cannot be zero"));
        }

        let mut data = vec![vec![0i64; n]; n];
        for (i, row) in data.iter_mut().enumerate() {
            row[i] = 1;
        }

        Ok(Matrix { data, rows: n, cols: n })
    }

    /// Get the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the dimension of the matrix
    pub fn dimension(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Fail with `DimensionMismatch` unless the matrix is square
    pub fn ensure_square(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(LatticeError::dimension_mismatch(
                (self.rows, self.rows),
                (self.rows, self.cols),
            ));
        }
        Ok(self.rows)
    }

    /// Get a reference to a specific element
    pub fn get(&self, row: usize, col: usize) -> Option<&i64> {
        self.data.get(row)?.get(col)
    }

    /// Get a column (a basis vector) as a vector
    pub fn get_col(&self, col: usize) -> Result<Vec<i64>> {
        if col >= self.cols {
            return Err(LatticeError::dimension_mismatch(
                (self.rows, self.cols),
                (self.rows, col + 1),
            ));
        }

        Ok(self.data.iter().map(|row| row[col]).collect())
    }

    /// Matrix multiplication
    pub fn mul(&self, other: &Matrix) -> Result<Self> {
        if self.cols != other.rows {
            return Err(LatticeError::dimension_mismatch(
                (self.rows, self.cols),
                (other.rows, other.cols),
            ));
        }

        let mut data = vec![vec![0i64; other.cols]; self.rows];

        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0i64;
                for k in 0..self.cols {
                    sum = self.data[i][k]
                        .checked_mul(other.data[k][j])
                        .and_then(|p| sum.checked_add(p))
                        .ok_or_else(|| overflow("matrix product"))?;
                }
                data[i][j] = sum;
            }
        }

        Ok(Matrix { data, rows: self.rows, cols: other.cols })
    }

    /// Matrix-vector product `self · x`
    pub fn mul_vec(&self, x: &[i64]) -> Result<Vec<i64>> {
        if x.len() != self.cols {
            return Err(LatticeError::dimension_mismatch(
                (self.cols, 1),
                (x.len(), 1),
            ));
        }

        self.data
            .iter()
            .map(|row| {
                row.iter().zip(x).try_fold(0i64, |acc, (&a, &b)| {
                    a.checked_mul(b)
                        .and_then(|p| acc.checked_add(p))
                        .ok_or_else(|| overflow("matrix-vector product"))
                })
            })
            .collect()
    }

    /// Fraction-free (Bareiss) elimination over big integers.
    ///
    /// Returns the rank and, for square matrices of full rank, the
    /// determinant. Every intermediate entry is a minor of the input, so the
    /// divisions are exact.
    fn bareiss(&self) -> (usize, Option<BigInt>) {
        let mut a: Vec<Vec<BigInt>> = self
            .data
            .iter()
            .map(|row| row.iter().map(|&v| BigInt::from(v)).collect())
            .collect();
        let (n, m) = (self.rows, self.cols);
        let mut prev = BigInt::one();
        let mut rank = 0;
        let mut negate = false;

        for col in 0..m {
            if rank == n {
                break;
            }
            let pivot = match (rank..n).find(|&r| !a[r][col].is_zero()) {
                Some(p) => p,
                None => continue,
            };
            if pivot != rank {
                a.swap(pivot, rank);
                negate = !negate;
            }
            for r in (rank + 1)..n {
                for c in (col + 1)..m {
                    let value = (&a[r][c] * &a[rank][col] - &a[r][col] * &a[rank][c]) / &prev;
                    a[r][c] = value;
                }
                a[r][col] = BigInt::zero();
            }
            prev = a[rank][col].clone();
            rank += 1;
        }

        let det = if self.is_square() && rank == n {
            let d = a[n - 1][n - 1].clone();
            Some(if negate { -d } else { d })
        } else {
            None
        };
        (rank, det)
    }

    /// Exact rank
    pub fn rank(&self) -> usize {
        self.bareiss().0
    }

    /// Compute the exact determinant (only for square matrices)
    ///
    /// Fails with `IntegerOverflow` if the determinant does not fit in `i128`.
    pub fn determinant(&self) -> Result<i128> {
        self.ensure_square()?;
        match self.bareiss().1 {
            Some(d) => d.to_i128().ok_or_else(|| overflow("determinant")),
            None => Ok(0),
        }
    }

    /// Convert to `f64` rows
    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.data
            .iter()
            .map(|row| row.iter().map(|&v| v as f64).collect())
            .collect()
    }

    /// Convert to Vec<Vec<i64>>
    pub fn to_vec(&self) -> Vec<Vec<i64>> {
        self.data.clone()
    }

    /// Borrow the rows
    pub fn as_rows(&self) -> &[Vec<i64>] {
        &self.data
    }
}

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Matrix {}x{}:", self.rows, self.cols)?;
        for row in &self.data {
            writeln!(f, "[{}]", row.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_creation() {
        let data = vec![vec![1, 2], vec![3, 4]];
        let matrix = Matrix::new(data).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Matrix::new(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, LatticeError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_from_f64_rows_requires_integers() {
        let m = Matrix::from_f64_rows(vec![vec![4.0, -2.0], vec![0.0, -1.0]]).unwrap();
        assert_eq!(m.get(0, 1), Some(&-2));

        let err = Matrix::from_f64_rows(vec![vec![0.5, 1.0], vec![0.0, 1.0]]).unwrap_err();
        assert!(matches!(err, LatticeError::InvalidParameters(_)));
    }

    #[test]
    fn test_matrix_multiplication() {
        let m1 = Matrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let m2 = Matrix::new(vec![vec![0, 1], vec![1, 0]]).unwrap();
        let product = m1.mul(&m2).unwrap();

        assert_eq!(product.to_vec(), vec![vec![2, 1], vec![4, 3]]);
    }

    #[test]
    fn test_mul_overflow_is_reported() {
        let big = Matrix::new(vec![vec![i64::MAX, i64::MAX], vec![0, 1]]).unwrap();
        let err = big.mul(&big).unwrap_err();
        assert!(matches!(err, LatticeError::IntegerOverflow(_)));
    }

    #[test]
    fn test_mul_vec() {
        let m = Matrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(m.mul_vec(&[1, -1]).unwrap(), vec![-1, -1]);
        assert!(m.mul_vec(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_determinant_2x2() {
        let matrix = Matrix::new(vec![vec![2, 3], vec![1, 4]]).unwrap();
        assert_eq!(matrix.determinant().unwrap(), 5);
    }

    #[test]
    fn test_determinant_3x3() {
        let matrix = Matrix::new(vec![vec![1, 2, 3], vec![0, 1, 4], vec![5, 6, 0]]).unwrap();
        assert_eq!(matrix.determinant().unwrap(), 1);
    }

    #[test]
    fn test_determinant_with_row_swap() {
        let matrix = Matrix::new(vec![vec![0, 1], vec![1, 0]]).unwrap();
        assert_eq!(matrix.determinant().unwrap(), -1);
    }

    #[test]
    fn test_determinant_4x4() {
        let b = Matrix::new(vec![
            vec![4, -2, 1, 0],
            vec![0, -1, 5, 2],
            vec![-1, 6, 1, -1],
            vec![0, 1, -1, 6],
        ])
        .unwrap();
        assert_eq!(b.determinant().unwrap().abs(), 760);
    }

    #[test]
    fn test_rank() {
        let dependent = Matrix::new(vec![vec![1, 2, 3], vec![2, 4, 6], vec![1, 0, 1]]).unwrap();
        assert_eq!(dependent.rank(), 2);
        assert_eq!(dependent.determinant().unwrap(), 0);

        let skipped_column = Matrix::new(vec![vec![0, 1], vec![0, 2]]).unwrap();
        assert_eq!(skipped_column.rank(), 1);
    }

    #[test]
    fn test_serde_round_trip_shape() {
        let m = Matrix::new(vec![vec![1, 0], vec![2, 3]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"rows":[[1,0],[2,3]]}"#);
        let ragged: std::result::Result<Matrix, _> = serde_json::from_str(r#"{"rows":[[1],[2,3]]}"#);
        assert!(ragged.is_err());
    }
}
