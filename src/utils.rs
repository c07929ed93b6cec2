//! Utility functions: HNF shape checks, seeded basis generators, timing

use crate::core::error::{LatticeError, Result};
use crate::core::lattice::Lattice;
use crate::core::matrix::Matrix;
use rand::rngs::StdRng;
use rand::{rng, Rng, SeedableRng};

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => {
            let mut entropy = rng();
            <StdRng as SeedableRng>::from_rng(&mut entropy)
        }
    }
}

/// Matrix shape predicates
pub mod matrix_utils {
    use super::*;

    /// Check if matrix is lower triangular
    pub fn is_lower_triangular(matrix: &Matrix) -> bool {
        for i in 0..matrix.rows() {
            for j in (i + 1)..matrix.cols() {
                if matrix.get(i, j).unwrap_or(&0) != &0 {
                    return false;
                }
            }
        }
        true
    }

    /// Check the canonical lower-triangular HNF shape: square, positive
    /// diagonal, zeros above it and `0 <= H[i][j] < H[i][i]` below it
    pub fn is_hermite_normal_form(matrix: &Matrix) -> bool {
        if !matrix.is_square() || !is_lower_triangular(matrix) {
            return false;
        }
        let rows = matrix.as_rows();
        rows.iter().enumerate().all(|(i, row)| {
            let pivot = row[i];
            pivot > 0 && row[..i].iter().all(|&v| (0..pivot).contains(&v))
        })
    }
}

/// Seeded generators for test and demo bases
pub mod generators {
    use super::*;

    /// Random unimodular matrix built from `steps` elementary column
    /// operations (`col_j += k·col_i`, occasional sign flips) on the identity
    pub fn generate_random_unimodular(n: usize, steps: usize, seed: Option<u64>) -> Result<Matrix> {
        if n == 0 {
            return Err(LatticeError::invalid_parameters("Dimension must be positive"));
        }
        let mut rng = seeded_rng(seed);
        let mut data = Matrix::identity(n)?.to_vec();

        for _ in 0..steps {
            if n > 1 {
                let i = rng.random_range(0..n);
                let mut j = rng.random_range(0..n - 1);
                if j >= i {
                    j += 1;
                }
                let k: i64 = if rng.random_bool(0.5) {
                    rng.random_range(1..=2)
                } else {
                    -rng.random_range(1..=2)
                };
                for row in data.iter_mut() {
                    let value = k
                        .checked_mul(row[i])
                        .and_then(|v| row[j].checked_add(v))
                        .ok_or_else(|| {
                            LatticeError::integer_overflow("unimodular generator entry exceeds i64")
                        })?;
                    row[j] = value;
                }
            }
            if rng.random_bool(0.1) {
                let col = rng.random_range(0..n);
                for row in data.iter_mut() {
                    row[col] = -row[col];
                }
            }
        }

        Matrix::new(data)
    }

    /// Random strictly diagonally dominant basis, a typical "good" private basis.
    ///
    /// Off-diagonal entries lie in `[-2, 2]` and every diagonal entry
    /// exceeds the absolute sum of the rest of its row, so the basis is
    /// always full rank and close to orthogonal.
    pub fn generate_near_orthogonal_basis(n: usize, seed: Option<u64>) -> Result<Lattice> {
        if n == 0 {
            return Err(LatticeError::invalid_parameters("Dimension must be positive"));
        }
        let mut rng = seeded_rng(seed);
        let bound = 2 * (n as i64 - 1);

        let mut data = vec![vec![0i64; n]; n];
        for (i, row) in data.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                if i != j {
                    *v = rng.random_range(-2..=2);
                }
            }
            let magnitude = bound + rng.random_range(1..=(n as i64 + 2));
            row[i] = if rng.random_bool(0.5) { magnitude } else { -magnitude };
        }

        Lattice::from_matrix(data)
    }
}

/// Profiling utilities
pub mod profiling {
    use std::time::{Duration, Instant};

    /// Run `func` and return its result with the elapsed time, logged at debug level
    pub fn time_function<F, R>(name: &str, func: F) -> (R, Duration)
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = func();
        let duration = start.elapsed();

        log::debug!("Function '{}' took {:.2?}", name, duration);
        (result, duration)
    }
}

pub use generators::*;
pub use matrix_utils::*;
pub use profiling::*;
