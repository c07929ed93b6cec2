//! Real-valued vectors and matrices for the floating-point side of the scheme

use crate::core::error::{LatticeError, Result};
use crate::core::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// Vector in lattice space (ciphertexts, noise, recovered messages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LatticeVector {
    data: Vec<f64>,
}

impl LatticeVector {
    /// Create a new lattice vector
    pub fn new(data: Vec<f64>) -> Self {
        LatticeVector { data }
    }

    /// Create a zero vector of given dimension
    pub fn zeros(dimension: usize) -> Self {
        LatticeVector { data: vec![0.0; dimension] }
    }

    /// Get the dimension
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> Option<&f64> {
        self.data.get(index)
    }

    /// Get backing slice (read-only)
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Largest absolute coordinate
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0f64, |acc, x| acc.max(x.abs()))
    }

    /// Addition
    pub fn add(&self, other: &LatticeVector) -> Result<Self> {
        if self.dimension() != other.dimension() {
            return Err(LatticeError::dimension_mismatch(
                (self.dimension(), 1),
                (other.dimension(), 1),
            ));
        }

        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a + b).collect();
        Ok(LatticeVector::new(data))
    }

    /// Subtraction
    pub fn sub(&self, other: &LatticeVector) -> Result<Self> {
        if self.dimension() != other.dimension() {
            return Err(LatticeError::dimension_mismatch(
                (self.dimension(), 1),
                (other.dimension(), 1),
            ));
        }

        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a - b).collect();
        Ok(LatticeVector::new(data))
    }

    /// Scalar multiplication
    pub fn scalar_mul(&self, scalar: f64) -> Self {
        LatticeVector::new(self.data.iter().map(|x| x * scalar).collect())
    }

    /// Round every coordinate to the nearest integer, ties away from zero
    pub fn round(&self) -> Self {
        LatticeVector::new(self.data.iter().map(|x| x.round()).collect())
    }

    /// Convert to integer vector (rounding ties away from zero)
    pub fn to_integer_vec(&self) -> Vec<i64> {
        self.data.iter().map(|x| x.round() as i64).collect()
    }

    /// Create from integer vector
    pub fn from_integer_vec(data: &[i64]) -> Self {
        LatticeVector::new(data.iter().map(|&x| x as f64).collect())
    }
}

impl std::fmt::Display for LatticeVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.data.iter().map(|x| format!("{:.3}", x)).collect::<Vec<_>>().join(", "))
    }
}

/// Dense real square-or-rectangular matrix used for inversion and rounding
#[derive(Debug, Clone, PartialEq)]
pub struct RealMatrix {
    data: Vec<Vec<f64>>,
    rows: usize,
    cols: usize,
}

impl RealMatrix {
    pub fn new(data: Vec<Vec<f64>>) -> Result<Self> {
        if data.is_empty() || data[0].is_empty() {
            return Err(LatticeError::invalid_parameters("Matrix cannot be empty"));
        }
        let rows = data.len();
        let cols = data[0].len();
        if let Some(row) = data.iter().find(|r| r.len() != cols) {
            return Err(LatticeError::dimension_mismatch((rows, cols), (rows, row.len())));
        }
        Ok(RealMatrix { data, rows, cols })
    }

    pub fn from_integer(matrix: &Matrix) -> Self {
        let (rows, cols) = matrix.dimension();
        RealMatrix { data: matrix.to_f64_rows(), rows, cols }
    }

    pub fn dimension(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&f64> {
        self.data.get(row)?.get(col)
    }

    /// Matrix-vector product
    pub fn mul_vec(&self, v: &LatticeVector) -> Result<LatticeVector> {
        if v.dimension() != self.cols {
            return Err(LatticeError::dimension_mismatch((self.cols, 1), (v.dimension(), 1)));
        }
        let data = self
            .data
            .iter()
            .map(|row| row.iter().zip(v.as_slice()).map(|(a, b)| a * b).sum())
            .collect();
        Ok(LatticeVector::new(data))
    }

    /// Matrix product
    pub fn mul(&self, other: &RealMatrix) -> Result<RealMatrix> {
        if self.cols != other.rows {
            return Err(LatticeError::dimension_mismatch(
                (self.rows, self.cols),
                (other.rows, other.cols),
            ));
        }
        let mut data = vec![vec![0.0; other.cols]; self.rows];
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    data[i][j] += a * other.data[k][j];
                }
            }
        }
        Ok(RealMatrix { data, rows: self.rows, cols: other.cols })
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Only an exactly zero or non-finite pivot is reported as
    /// [`LatticeError::SingularBasis`]. Integer bases should be checked for
    /// full rank exactly before they get here; a tiny pivot on an integer
    /// matrix is a scaling artifact, not a rank defect.
    pub fn inverse(&self) -> Result<RealMatrix> {
        if self.rows != self.cols {
            return Err(LatticeError::dimension_mismatch(
                (self.rows, self.rows),
                (self.rows, self.cols),
            ));
        }
        let n = self.rows;

        let mut a = self.data.clone();
        let mut inv: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
                .unwrap_or(col);
            if a[pivot][col] == 0.0 || !a[pivot][col].is_finite() {
                return Err(LatticeError::singular_basis(format!(
                    "no usable pivot in column {} while inverting",
                    col
                )));
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let p = a[col][col];
            for j in 0..n {
                a[col][j] /= p;
                inv[col][j] /= p;
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = a[r][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n {
                    a[r][j] -= factor * a[col][j];
                    inv[r][j] -= factor * inv[col][j];
                }
            }
        }

        Ok(RealMatrix { data: inv, rows: n, cols: n })
    }

    /// Solve `self · x = b` by forward substitution.
    ///
    /// `self` must be lower triangular with a nonzero diagonal. When every
    /// partial sum is an integer below `2^53` the result is exact.
    pub fn solve_lower_triangular(&self, b: &LatticeVector) -> Result<LatticeVector> {
        if self.rows != self.cols {
            return Err(LatticeError::dimension_mismatch(
                (self.rows, self.rows),
                (self.rows, self.cols),
            ));
        }
        if b.dimension() != self.rows {
            return Err(LatticeError::dimension_mismatch((self.rows, 1), (b.dimension(), 1)));
        }

        let mut x: Vec<f64> = Vec::with_capacity(self.rows);
        for (i, row) in self.data.iter().enumerate() {
            if row[i + 1..].iter().any(|&v| v != 0.0) {
                return Err(LatticeError::invalid_parameters(format!(
                    "row {} has entries above the diagonal",
                    i
                )));
            }
            let diagonal = row[i];
            if diagonal == 0.0 || !diagonal.is_finite() {
                return Err(LatticeError::singular_basis(format!(
                    "zero diagonal entry in row {}",
                    i
                )));
            }
            let partial = row[..i].iter().zip(&x).fold(b.as_slice()[i], |acc, (h, v)| acc - h * v);
            x.push(partial / diagonal);
        }
        Ok(LatticeVector::new(x))
    }
}
