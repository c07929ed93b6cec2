// Big integer matrix used as the working storage of HNF reduction.
// Intermediate entries of the column algorithm grow far past i64 even when
// the final H and U are small; only finished matrices are narrowed.
use crate::core::error::{LatticeError, Result};
use crate::core::matrix::Matrix;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct BigIntMatrix {
    data: Vec<Vec<BigInt>>,
    rows: usize,
    cols: usize,
}

impl BigIntMatrix {
    pub fn identity(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(LatticeError::invalid_parameters("Identity matrix requires n>0"));
        }
        let mut data = vec![vec![BigInt::zero(); n]; n];
        for (i, row) in data.iter_mut().enumerate() {
            row[i] = BigInt::one();
        }
        Ok(BigIntMatrix { data, rows: n, cols: n })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&BigInt> {
        self.data.get(row)?.get(col)
    }

    /// `col_i <- a·col_i + b·col_j`, `col_j <- c·col_i + d·col_j`
    pub fn combine_columns(&mut self, i: usize, j: usize, a: &BigInt, b: &BigInt, c: &BigInt, d: &BigInt) {
        for row in self.data.iter_mut() {
            let new_i = a * &row[i] + b * &row[j];
            let new_j = c * &row[i] + d * &row[j];
            row[i] = new_i;
            row[j] = new_j;
        }
    }

    pub fn negate_column(&mut self, col: usize) {
        for row in self.data.iter_mut() {
            row[col] = -std::mem::take(&mut row[col]);
        }
    }

    /// `col_target <- col_target - factor·col_source`
    pub fn sub_column_multiple(&mut self, target: usize, source: usize, factor: &BigInt) {
        for row in self.data.iter_mut() {
            let delta = factor * &row[source];
            row[target] -= delta;
        }
    }

    /// Narrow back to the `i64` matrix type, failing if any entry does not fit
    pub fn to_matrix_i64(&self) -> Result<Matrix> {
        let mut data: Vec<Vec<i64>> = Vec::with_capacity(self.rows);
        for (r, row) in self.data.iter().enumerate() {
            let mut out: Vec<i64> = Vec::with_capacity(self.cols);
            for (c, v) in row.iter().enumerate() {
                match v.to_i64() {
                    Some(i) => out.push(i),
                    None => {
                        return Err(LatticeError::integer_overflow(format!(
                            "entry ({}, {}) = {} cannot be represented as i64",
                            r, c, v
                        )))
                    }
                }
            }
            data.push(out);
        }
        Matrix::new(data)
    }
}

impl From<&Matrix> for BigIntMatrix {
    fn from(m: &Matrix) -> Self {
        let data = m
            .as_rows()
            .iter()
            .map(|row| row.iter().map(|&v| BigInt::from(v)).collect())
            .collect();
        BigIntMatrix { data, rows: m.rows(), cols: m.cols() }
    }
}

impl fmt::Display for BigIntMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BigIntMatrix {}x{}:", self.rows, self.cols)?;
        for row in &self.data {
            write!(f, "[")?;
            for (i, v) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_i64() {
        let m = Matrix::new(vec![vec![1, -2], vec![3, 4]]).unwrap();
        let big = BigIntMatrix::from(&m);
        assert_eq!(big.get(0, 1), Some(&BigInt::from(-2)));
        assert_eq!(big.to_matrix_i64().unwrap(), m);
    }

    #[test]
    fn test_column_operations() {
        let m = Matrix::new(vec![vec![5, 2], vec![7, 3]]).unwrap();
        let mut big = BigIntMatrix::from(&m);

        big.sub_column_multiple(0, 1, &BigInt::from(2));
        big.negate_column(1);
        assert_eq!(big.to_matrix_i64().unwrap().to_vec(), vec![vec![1, -2], vec![1, -3]]);

        // swap the columns
        let (zero, one) = (BigInt::zero(), BigInt::one());
        big.combine_columns(0, 1, &zero, &one, &one, &zero);
        assert_eq!(big.to_matrix_i64().unwrap().to_vec(), vec![vec![-2, 1], vec![-3, 1]]);
    }

    #[test]
    fn test_narrowing_overflow() {
        let m = Matrix::new(vec![vec![i64::MAX, 0], vec![0, 1]]).unwrap();
        let mut big = BigIntMatrix::from(&m);
        let two = BigInt::from(2);
        let zero = BigInt::zero();
        let one = BigInt::one();
        big.combine_columns(0, 1, &two, &zero, &zero, &one);
        assert!(matches!(big.to_matrix_i64(), Err(LatticeError::IntegerOverflow(_))));
    }

    #[test]
    fn test_identity() {
        let id = BigIntMatrix::identity(3).unwrap();
        assert_eq!(id.to_matrix_i64().unwrap(), Matrix::identity(3).unwrap());
        assert!(BigIntMatrix::identity(0).is_err());
    }
}
