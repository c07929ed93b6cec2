//! GGH key pair: private basis `B` and its public HNF `H`

use crate::core::error::Result;
use crate::core::lattice::Lattice;
use crate::core::matrix::Matrix;
use crate::core::types::LatticeVector;
use crate::decrypt::{DecryptionPath, Decryptor};
use crate::hnf::HermiteReducer;
use std::fmt;

/// Key pair derived from a validated private basis.
///
/// The private basis never leaves this type; only the public basis and
/// decryption results are exposed.
#[derive(Clone)]
pub struct LatticeKeyPair {
    public_basis: Matrix,
    private_decryptor: Decryptor,
    public_decryptor: Decryptor,
}

impl LatticeKeyPair {
    /// Derive the public basis of `private` and precompute both decryptors
    pub fn new(private: Lattice) -> Result<Self> {
        let n = private.dimension();
        let reduction = HermiteReducer::new().reduce(private.basis())?;
        let public_basis = reduction.hnf;

        let private_decryptor = Decryptor::private(private.basis(), &public_basis)?;
        let public_decryptor = Decryptor::public(&public_basis)?;

        log::info!(
            "generated {}-dimensional key pair ({} column operations)",
            n,
            reduction.column_operations
        );
        Ok(LatticeKeyPair {
            public_basis,
            private_decryptor,
            public_decryptor,
        })
    }

    /// Validate raw rows as a lattice basis, then derive the key pair
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        LatticeKeyPair::new(Lattice::from_matrix(rows)?)
    }

    /// The public HNF basis `H`
    pub fn public_basis(&self) -> &Matrix {
        &self.public_basis
    }

    pub fn dimension(&self) -> usize {
        self.public_basis.rows()
    }

    /// Decrypt by rounding against the private basis
    pub fn decrypt(&self, ciphertext: &LatticeVector) -> Result<LatticeVector> {
        self.private_decryptor.decrypt(ciphertext)
    }

    /// Decrypt by rounding against the public basis; usually wrong once noise is present
    pub fn decrypt_with_public(&self, ciphertext: &LatticeVector) -> Result<LatticeVector> {
        self.public_decryptor.decrypt(ciphertext)
    }

    pub fn decryptor(&self, path: DecryptionPath) -> &Decryptor {
        match path {
            DecryptionPath::Private => &self.private_decryptor,
            DecryptionPath::Public => &self.public_decryptor,
        }
    }
}

impl fmt::Debug for LatticeKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatticeKeyPair")
            .field("dimension", &self.dimension())
            .field("public_basis", &self.public_basis.to_vec())
            .finish()
    }
}
