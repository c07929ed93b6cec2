//! Hermite Normal Form reduction (Nemhauser/Wolsey column algorithm)
//!
//! Reduces a square integer basis `B` (basis vectors are columns) to the
//! lower-triangular Hermite Normal Form `H = B·U` using only unimodular
//! column operations, accumulating `U` alongside. All arithmetic is exact:
//! the working matrices are [`BigIntMatrix`] and only the finished `H` and
//! `U` are narrowed back to `i64`.

use crate::core::bigint_matrix::BigIntMatrix;
use crate::core::error::{LatticeError, Result};
use crate::core::matrix::Matrix;
use crate::euclid::extended_gcd;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

/// Output of a reduction: the HNF and the unimodular transform that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct HnfResult {
    /// Lower-triangular HNF `H = B·U`
    pub hnf: Matrix,
    /// Accumulated unimodular transform `U`
    pub transform: Matrix,
    /// Number of elementary column operations applied
    pub column_operations: usize,
}

/// Hermite Normal Form reducer
#[derive(Debug, Clone, Default)]
pub struct HermiteReducer;

impl HermiteReducer {
    pub fn new() -> Self {
        HermiteReducer
    }

    /// Reduce `basis` to Hermite Normal Form.
    ///
    /// After row `i` is processed, `H[i][i] > 0`, `H[i][j] = 0` for `j > i`
    /// and `0 <= H[i][j] < H[i][i]` for `j < i`. Later rows only add
    /// multiples of columns that are zero above their own pivot, so finished
    /// rows keep their shape.
    ///
    /// # Errors
    ///
    /// * `DimensionMismatch` if the basis is not square
    /// * `SingularBasis` if a zero pivot remains after clearing a row, which
    ///   means the columns were linearly dependent
    /// * `IntegerOverflow` if the finished `H` or `U` does not fit in `i64`
    pub fn reduce(&self, basis: &Matrix) -> Result<HnfResult> {
        let n = basis.ensure_square()?;
        let mut h = BigIntMatrix::from(basis);
        let mut u = BigIntMatrix::identity(n)?;
        let mut ops = 0usize;

        log::debug!("HNF reduction of {}x{} basis", n, n);

        for i in 0..n {
            ops += self.clear_row(&mut h, &mut u, i);

            let pivot = entry(&h, i, i);
            if pivot.is_zero() {
                return Err(LatticeError::singular_basis(format!(
                    "zero pivot at row {} after clearing; basis columns are dependent",
                    i
                )));
            }

            if pivot.is_negative() {
                log::trace!("row {}: negating column {}", i, i);
                h.negate_column(i);
                u.negate_column(i);
                ops += 1;
            }

            ops += self.reduce_row(&mut h, &mut u, i);
            log::trace!("row {} finished, pivot {}", i, entry(&h, i, i));
        }

        log::debug!("HNF reduction finished after {} column operations", ops);

        Ok(HnfResult {
            hnf: h.to_matrix_i64()?,
            transform: u.to_matrix_i64()?,
            column_operations: ops,
        })
    }

    /// Zero out `H[i][j]` for every `j > i`, folding the gcd into `H[i][i]`
    fn clear_row(&self, h: &mut BigIntMatrix, u: &mut BigIntMatrix, i: usize) -> usize {
        let mut ops = 0;
        for j in (i + 1)..h.cols() {
            let b = entry(h, i, j);
            if b.is_zero() {
                continue;
            }
            let a = entry(h, i, i);

            let (r, p, q) = extended_gcd(a.clone(), b.clone());
            // r > 0 since b != 0, and r divides both a and b exactly
            let s = -(&b / &r);
            let t = &a / &r;
            log::trace!("row {}: columns ({}, {}) gcd={}", i, i, j, r);

            h.combine_columns(i, j, &p, &q, &s, &t);
            u.combine_columns(i, j, &p, &q, &s, &t);
            ops += 1;
        }
        ops
    }

    /// Bring `H[i][j]` into `[0, H[i][i])` for every `j < i`
    fn reduce_row(&self, h: &mut BigIntMatrix, u: &mut BigIntMatrix, i: usize) -> usize {
        let pivot = entry(h, i, i);
        let mut ops = 0;
        for j in 0..i {
            let factor = entry(h, i, j).div_floor(&pivot);
            if factor.is_zero() {
                continue;
            }
            h.sub_column_multiple(j, i, &factor);
            u.sub_column_multiple(j, i, &factor);
            ops += 1;
        }
        ops
    }
}

fn entry(m: &BigIntMatrix, row: usize, col: usize) -> BigInt {
    m.get(row, col).cloned().unwrap_or_default()
}

/// Convenience wrapper around [`HermiteReducer::reduce`]
pub fn hermite_normal_form(basis: &Matrix) -> Result<HnfResult> {
    HermiteReducer::new().reduce(basis)
}
