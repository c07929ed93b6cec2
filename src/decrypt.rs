//! Babai rounding decryption
//!
//! Both paths compute `y = R⁻¹c`, round `y` to the nearest integer vector,
//! rebuild the lattice point `R·round(y)` exactly and map it back to
//! message coordinates with `H⁻¹`. The private path rounds against the
//! good basis `R = B`; the public path rounds against `R = H`, which
//! normally fails once the noise is large relative to `H`'s short sides.
//!
//! Singularity is decided exactly on the integer bases. `H` is lower
//! triangular, so every solve against it is a forward substitution rather
//! than a product with a floating-point inverse.

use crate::core::error::{LatticeError, Result};
use crate::core::matrix::Matrix;
use crate::core::types::{LatticeVector, RealMatrix};
use crate::utils::matrix_utils::is_lower_triangular;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which basis the ciphertext is rounded against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecryptionPath {
    /// Round against the private basis `B`
    #[default]
    Private,
    /// Round against the public HNF basis `H`
    Public,
}

impl fmt::Display for DecryptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecryptionPath::Private => write!(f, "private"),
            DecryptionPath::Public => write!(f, "public"),
        }
    }
}

/// Precomputed decryption state for one rounding basis
#[derive(Clone)]
pub struct Decryptor {
    path: DecryptionPath,
    rounding_basis: Matrix,
    /// `B⁻¹` on the private path; `None` when rounding against `H`
    rounding_inverse: Option<RealMatrix>,
    public_basis: RealMatrix,
}

impl Decryptor {
    /// Decryptor that rounds against `private_basis`
    pub fn private(private_basis: &Matrix, public_basis: &Matrix) -> Result<Self> {
        Decryptor::build(DecryptionPath::Private, private_basis, public_basis)
    }

    /// Decryptor that rounds against `public_basis` itself
    pub fn public(public_basis: &Matrix) -> Result<Self> {
        Decryptor::build(DecryptionPath::Public, public_basis, public_basis)
    }

    fn build(path: DecryptionPath, rounding: &Matrix, public: &Matrix) -> Result<Self> {
        let n = rounding.ensure_square()?;
        let m = public.ensure_square()?;
        if n != m {
            return Err(LatticeError::dimension_mismatch((n, n), (m, m)));
        }
        if !is_lower_triangular(public) {
            return Err(LatticeError::invalid_parameters(
                "public basis must be lower triangular",
            ));
        }
        if let Some(i) = (0..m).find(|&i| public.get(i, i) == Some(&0)) {
            return Err(LatticeError::singular_basis(format!(
                "public basis has a zero diagonal entry in row {}",
                i
            )));
        }

        let rounding_inverse = match path {
            DecryptionPath::Public => None,
            DecryptionPath::Private => {
                let rank = rounding.rank();
                if rank < n {
                    return Err(LatticeError::singular_basis(format!(
                        "private basis has rank {} < {}",
                        rank, n
                    )));
                }
                Some(RealMatrix::from_integer(rounding).inverse()?)
            }
        };

        Ok(Decryptor {
            path,
            rounding_basis: rounding.clone(),
            rounding_inverse,
            public_basis: RealMatrix::from_integer(public),
        })
    }

    pub fn path(&self) -> DecryptionPath {
        self.path
    }

    pub fn dimension(&self) -> usize {
        self.rounding_basis.rows()
    }

    /// Recover message coordinates from a ciphertext.
    ///
    /// Returns real coordinates; callers take `to_integer_vec()` for the
    /// message. A noise vector outside the rounding region yields a wrong
    /// message without any error.
    pub fn decrypt(&self, ciphertext: &LatticeVector) -> Result<LatticeVector> {
        let n = self.dimension();
        if ciphertext.dimension() != n {
            return Err(LatticeError::dimension_mismatch((n, 1), (ciphertext.dimension(), 1)));
        }

        let y = match &self.rounding_inverse {
            Some(inverse) => inverse.mul_vec(ciphertext)?,
            None => self.public_basis.solve_lower_triangular(ciphertext)?,
        };
        let rounded = y.round();
        let residual = y.sub(&rounded)?.max_abs();
        log::debug!(
            "{} decryption: max rounding residual {:.6}",
            self.path,
            residual
        );

        let coefficients = to_coefficients(&rounded)?;
        let point = self.rounding_basis.mul_vec(&coefficients)?;
        self.public_basis
            .solve_lower_triangular(&LatticeVector::from_integer_vec(&point))
    }
}

impl fmt::Debug for Decryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decryptor")
            .field("path", &self.path)
            .field("dimension", &self.dimension())
            .finish()
    }
}

fn to_coefficients(rounded: &LatticeVector) -> Result<Vec<i64>> {
    rounded
        .as_slice()
        .iter()
        .map(|&v| {
            if v.is_finite() && v.abs() < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(LatticeError::numerical_instability(format!(
                    "rounded coordinate {} is not a representable integer",
                    v
                )))
            }
        })
        .collect()
}

/// One-shot private-basis decryption
pub fn decrypt(
    ciphertext: &LatticeVector,
    private_basis: &Matrix,
    public_basis: &Matrix,
) -> Result<LatticeVector> {
    Decryptor::private(private_basis, public_basis)?.decrypt(ciphertext)
}

/// One-shot public-basis decryption
pub fn decrypt_with_public(ciphertext: &LatticeVector, public_basis: &Matrix) -> Result<LatticeVector> {
    Decryptor::public(public_basis)?.decrypt(ciphertext)
}
