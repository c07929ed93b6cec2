//! GGH-style lattice encryption
//!
//! This crate provides:
//! - Extended Euclid over any signed integer type
//! - Hermite Normal Form reduction with exact big-integer arithmetic
//! - Key pairs: a private "good" basis and its public HNF
//! - Encryption `c = H·x + e` with fixed-norm noise and explicit randomness
//! - Babai rounding decryption against the private or the public basis
//!
//! # Examples
//!
//! Round trip with a fixed noise vector:
//! ```rust
//! use ggh_lattice::{encrypt_with_noise, LatticeKeyPair, LatticeVector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = LatticeKeyPair::from_rows(vec![
//!     vec![4, -2, 1, 0],
//!     vec![0, -1, 5, 2],
//!     vec![-1, 6, 1, -1],
//!     vec![0, 1, -1, 6],
//! ])?;
//!
//! let noise = LatticeVector::new(vec![0.0, 2.0, 0.0, 0.0]);
//! let c = encrypt_with_noise(&[3, 5, 7, 9], keys.public_basis(), &noise)?;
//! assert_eq!(keys.decrypt(&c)?.to_integer_vec(), vec![3, 5, 7, 9]);
//! # Ok(())
//! # }
//! ```
//!
//! Seeded encryption is reproducible:
//! ```rust
//! use ggh_lattice::{Encryptor, LatticeKeyPair};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = LatticeKeyPair::from_rows(vec![vec![7, 1], vec![-1, 6]])?;
//! let a = Encryptor::seeded(42).encrypt(&[2, -3], keys.public_basis())?;
//! let b = Encryptor::seeded(42).encrypt(&[2, -3], keys.public_basis())?;
//! assert_eq!(a, b);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod decrypt;
pub mod encrypt;
pub mod euclid;
pub mod hnf;
pub mod keypair;
pub mod utils;

pub use crate::core::*;
pub use decrypt::{decrypt, decrypt_with_public, DecryptionPath, Decryptor};
pub use encrypt::{
    encrypt_with_noise, encrypt_with_rng, sample_noise, EncryptionParams, Encryptor, RngMode,
    DEFAULT_NOISE_BOUND,
};
pub use euclid::extended_gcd;
pub use hnf::{hermite_normal_form, HermiteReducer, HnfResult};
pub use keypair::LatticeKeyPair;
