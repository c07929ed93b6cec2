//! Core error types for lattice encryption operations

use thiserror::Error;

/// Error types for key derivation, encryption and decryption
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// A matrix is not square, or a vector does not match the basis dimension
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Basis columns are not linearly independent
    #[error("Basis columns are linearly dependent: rank {rank} < dimension {dimension}")]
    LinearDependence { rank: usize, dimension: usize },

    /// Zero pivot during HNF reduction, or a basis that cannot be inverted
    #[error("Singular basis: {0}")]
    SingularBasis(String),

    /// Exact integer arithmetic left the i64 range
    #[error("Integer overflow: {0}")]
    IntegerOverflow(String),

    /// Numerical instability detected
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed basis or vector input
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for LatticeError {
    fn from(e: std::io::Error) -> Self {
        LatticeError::io(format!("I/O Error: {}", e))
    }
}

impl From<serde_json::Error> for LatticeError {
    fn from(e: serde_json::Error) -> Self {
        LatticeError::parse(format!("JSON: {}", e))
    }
}

/// Result type for lattice operations
pub type Result<T> = std::result::Result<T, LatticeError>;

impl LatticeError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: (usize, usize), found: (usize, usize)) -> Self {
        LatticeError::DimensionMismatch { expected, found }
    }

    /// Create a linear dependence error
    pub fn linear_dependence(rank: usize, dimension: usize) -> Self {
        LatticeError::LinearDependence { rank, dimension }
    }

    /// Create a singular basis error
    pub fn singular_basis(msg: impl Into<String>) -> Self {
        LatticeError::SingularBasis(msg.into())
    }

    /// Create an integer overflow error
    pub fn integer_overflow(msg: impl Into<String>) -> Self {
        LatticeError::IntegerOverflow(msg.into())
    }

    /// Create a numerical instability error
    pub fn numerical_instability(msg: impl Into<String>) -> Self {
        LatticeError::NumericalInstability(msg.into())
    }

    /// Create an invalid parameters error
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        LatticeError::InvalidParameters(msg.into())
    }

    /// Create an I/O error
    pub fn io(msg: impl Into<String>) -> Self {
        LatticeError::Io(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        LatticeError::Parse(msg.into())
    }
}
