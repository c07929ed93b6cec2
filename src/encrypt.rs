//! GGH encryption: `c = H·x + e`
//!
//! The lattice point `H·x` is computed exactly in integers; the noise `e`
//! is a uniform direction rescaled to a fixed Euclidean norm.

use crate::core::error::{LatticeError, Result};
use crate::core::matrix::Matrix;
use crate::core::types::LatticeVector;
use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::{rng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Euclidean norm of every noise vector unless configured otherwise
pub const DEFAULT_NOISE_BOUND: f64 = 2.0;

/// Where an [`Encryptor`] gets its randomness from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngMode {
    /// Seeded from the operating system; every run differs
    #[default]
    Entropy,
    /// Fixed seed; the full sequence of noise vectors is reproducible
    Seeded(u64),
}

impl RngMode {
    fn build(self) -> StdRng {
        match self {
            RngMode::Seeded(seed) => StdRng::seed_from_u64(seed),
            RngMode::Entropy => {
                let mut entropy = rng();
                <StdRng as SeedableRng>::from_rng(&mut entropy)
            }
        }
    }
}

/// Parameters for encryption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionParams {
    /// Euclidean norm of the noise vector (> 0)
    pub noise_bound: f64,
    /// Random source
    pub rng_mode: RngMode,
}

impl Default for EncryptionParams {
    fn default() -> Self {
        EncryptionParams {
            noise_bound: DEFAULT_NOISE_BOUND,
            rng_mode: RngMode::Entropy,
        }
    }
}

impl EncryptionParams {
    /// Default noise bound with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        EncryptionParams {
            rng_mode: RngMode::Seeded(seed),
            ..Default::default()
        }
    }

    pub fn with_noise_bound(mut self, noise_bound: f64) -> Self {
        self.noise_bound = noise_bound;
        self
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.noise_bound.is_finite() && self.noise_bound > 0.0) {
            return Err(LatticeError::invalid_parameters(format!(
                "Noise bound must be finite and positive, got {}",
                self.noise_bound
            )));
        }
        Ok(())
    }
}

/// Encryptor owning its random source
#[derive(Debug, Clone)]
pub struct Encryptor {
    params: EncryptionParams,
    rng: StdRng,
}

impl Default for Encryptor {
    fn default() -> Self {
        Encryptor::new()
    }
}

impl Encryptor {
    /// Entropy-seeded encryptor with the default noise bound
    pub fn new() -> Self {
        let params = EncryptionParams::default();
        Encryptor { rng: params.rng_mode.build(), params }
    }

    /// Create an encryptor from validated parameters
    pub fn with_params(params: EncryptionParams) -> Result<Self> {
        params.validate()?;
        Ok(Encryptor { rng: params.rng_mode.build(), params })
    }

    /// Shorthand for `with_params(EncryptionParams::seeded(seed))`
    pub fn seeded(seed: u64) -> Self {
        let params = EncryptionParams::seeded(seed);
        Encryptor { rng: params.rng_mode.build(), params }
    }

    pub fn params(&self) -> &EncryptionParams {
        &self.params
    }

    /// Encrypt `message` under `basis` (normally the public basis `H`)
    pub fn encrypt(&mut self, message: &[i64], basis: &Matrix) -> Result<LatticeVector> {
        encrypt_with_rng(message, basis, self.params.noise_bound, &mut self.rng)
    }

    /// Draw one noise vector of the configured norm
    pub fn sample_noise(&mut self, dimension: usize) -> Result<LatticeVector> {
        sample_noise(dimension, self.params.noise_bound, &mut self.rng)
    }
}

/// Encrypt with an injected random source
pub fn encrypt_with_rng<R: Rng + ?Sized>(
    message: &[i64],
    basis: &Matrix,
    noise_bound: f64,
    rng: &mut R,
) -> Result<LatticeVector> {
    let n = basis.ensure_square()?;
    if message.len() != n {
        return Err(LatticeError::dimension_mismatch((n, 1), (message.len(), 1)));
    }
    let noise = sample_noise(n, noise_bound, rng)?;
    encrypt_with_noise(message, basis, &noise)
}

/// Deterministic core of encryption: `c = basis·message + noise`
pub fn encrypt_with_noise(
    message: &[i64],
    basis: &Matrix,
    noise: &LatticeVector,
) -> Result<LatticeVector> {
    let n = basis.ensure_square()?;
    if message.len() != n {
        return Err(LatticeError::dimension_mismatch((n, 1), (message.len(), 1)));
    }
    if noise.dimension() != n {
        return Err(LatticeError::dimension_mismatch((n, 1), (noise.dimension(), 1)));
    }

    let point = LatticeVector::from_integer_vec(&basis.mul_vec(message)?);
    let ciphertext = point.add(noise)?;

    log::debug!(
        "encrypted {}-dimensional message, noise norm {:.6}",
        n,
        noise.norm()
    );
    Ok(ciphertext)
}

/// Sample `dimension` uniform draws on `(-1, 1)` and rescale them to norm `noise_bound`.
///
/// `Uniform` is half-open, so an exact `-1.0` is redrawn.
pub fn sample_noise<R: Rng + ?Sized>(
    dimension: usize,
    noise_bound: f64,
    rng: &mut R,
) -> Result<LatticeVector> {
    if dimension == 0 {
        return Err(LatticeError::invalid_parameters("Noise dimension must be positive"));
    }
    let dist = Uniform::new(-1.0f64, 1.0)
        .map_err(|e| LatticeError::invalid_parameters(format!("noise distribution: {}", e)))?;
    let raw: Vec<f64> = (0..dimension)
        .map(|_| loop {
            let v = rng.sample(&dist);
            if v > -1.0 {
                break v;
            }
        })
        .collect();
    scale_to_norm(LatticeVector::new(raw), noise_bound)
}

/// Rescale a raw draw to Euclidean norm `bound`.
///
/// A zero vector has no direction and is reported as
/// [`LatticeError::NumericalInstability`]; no new draw is attempted.
pub fn scale_to_norm(raw: LatticeVector, bound: f64) -> Result<LatticeVector> {
    if !(bound.is_finite() && bound > 0.0) {
        return Err(LatticeError::invalid_parameters(format!(
            "Noise bound must be finite and positive, got {}",
            bound
        )));
    }
    let norm = raw.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(LatticeError::numerical_instability(format!(
            "noise draw has norm {}, cannot rescale",
            norm
        )));
    }
    Ok(raw.scalar_mul(bound / norm))
}
