//! Validated lattice bases
//!
//! A [`Lattice`] is a square integer basis whose columns are known to be
//! linearly independent. Constructing one is the precondition check for
//! building a key pair.

use crate::core::error::{LatticeError, Result};
use crate::core::matrix::{Matrix, MatrixRows};
use std::fs;
use std::path::Path;

/// A full-rank lattice represented by its basis matrix (basis vectors are columns)
#[derive(Clone, PartialEq)]
pub struct Lattice {
    basis: Matrix,
}

impl Lattice {
    /// Create a new lattice from a basis matrix, checking squareness and
    /// linear independence of the columns
    pub fn new(basis: Matrix) -> Result<Self> {
        let n = basis.ensure_square()?;
        let rank = basis.rank();
        if rank < n {
            return Err(LatticeError::linear_dependence(rank, n));
        }
        Ok(Lattice { basis })
    }

    /// Create a lattice from a 2D vector representation (rows of the basis matrix)
    pub fn from_matrix(data: Vec<Vec<i64>>) -> Result<Self> {
        Lattice::new(Matrix::new(data)?)
    }

    /// Create a lattice from integer-valued real rows
    pub fn from_f64_rows(data: Vec<Vec<f64>>) -> Result<Self> {
        Lattice::new(Matrix::from_f64_rows(data)?)
    }

    /// Lattice dimension n
    pub fn dimension(&self) -> usize {
        self.basis.rows()
    }

    /// Get a reference to the basis matrix
    pub fn basis(&self) -> &Matrix {
        &self.basis
    }

    pub fn into_basis(self) -> Matrix {
        self.basis
    }

    /// Absolute determinant, i.e. the covolume of the lattice
    pub fn determinant(&self) -> Result<u128> {
        Ok(self.basis.determinant()?.unsigned_abs())
    }

    /// Orthogonality defect `prod ||b_j|| / |det B|`.
    ///
    /// Equals 1 for an orthogonal basis and grows as the basis skews; a
    /// private basis should sit close to 1, its HNF far above it.
    pub fn orthogonality_defect(&self) -> Result<f64> {
        orthogonality_defect(&self.basis)
    }

    /// Save the basis as JSON (`{"rows": [[..], ..]}`)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.basis)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load a lattice from a file.
    ///
    /// Supported formats:
    ///  1. JSON object: `{"rows": [[..], ..]}`
    ///  2. JSON array: `[[..], [..], ..]`
    ///  3. Text: one row per line, integers separated by spaces, commas or
    ///     semicolons, optional surrounding brackets; `#` starts a comment line
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LatticeError::io(format!("Failed to read basis file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse a basis from any of the formats accepted by [`Lattice::load_from_file`]
    pub fn parse(content: &str) -> Result<Self> {
        let trimmed = content.trim();

        if trimmed.starts_with('{') {
            let rows: MatrixRows = serde_json::from_str(trimmed)?;
            return Self::from_matrix(rows.rows);
        }
        if trimmed.starts_with('[') {
            if let Ok(data) = serde_json::from_str::<Vec<Vec<i64>>>(trimmed) {
                return Self::from_matrix(data);
            }
        }

        let data = trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .enumerate()
            .map(|(i, line)| parse_row(line, i + 1))
            .collect::<Result<Vec<_>>>()?;
        Self::from_matrix(data)
    }
}

impl std::fmt::Debug for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lattice")
            .field("dimension", &self.dimension())
            .finish_non_exhaustive()
    }
}

/// Orthogonality defect of any square basis (columns are basis vectors)
pub fn orthogonality_defect(basis: &Matrix) -> Result<f64> {
    let det = basis.determinant()?;
    if det == 0 {
        return Err(LatticeError::singular_basis("orthogonality defect of a singular basis"));
    }
    let mut product = 1.0f64;
    for j in 0..basis.cols() {
        let col = basis.get_col(j)?;
        product *= col.iter().map(|&v| (v as f64).powi(2)).sum::<f64>().sqrt();
    }
    Ok(product / (det.unsigned_abs() as f64))
}

/// Parse a single matrix row from a line
fn parse_row(line: &str, line_no: usize) -> Result<Vec<i64>> {
    let clean = line
        .trim_start_matches(|c: char| c == '[' || c.is_whitespace())
        .trim_end_matches(|c: char| c == ']' || c == ',' || c.is_whitespace());

    let tokens: Vec<&str> = clean
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(LatticeError::parse(format!("Row {} has 0 entries", line_no)));
    }

    tokens
        .into_iter()
        .map(|tok| {
            tok.parse::<i64>().map_err(|e| {
                LatticeError::parse(format!(
                    "Failed to parse integer at row {}: '{}': {}",
                    line_no, tok, e
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_rows() -> Vec<Vec<i64>> {
        vec![
            vec![4, -2, 1, 0],
            vec![0, -1, 5, 2],
            vec![-1, 6, 1, -1],
            vec![0, 1, -1, 6],
        ]
    }

    #[test]
    fn test_lattice_creation() {
        let lattice = Lattice::from_matrix(reference_rows()).unwrap();
        assert_eq!(lattice.dimension(), 4);
        assert_eq!(lattice.determinant().unwrap(), 760);
    }

    #[test]
    fn test_non_square_rejected() {
        let err = Lattice::from_matrix(vec![vec![1, 0, 0], vec![0, 1, 0]]).unwrap_err();
        assert!(matches!(err, LatticeError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_dependent_columns_rejected() {
        let err = Lattice::from_matrix(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap_err();
        assert_eq!(err, LatticeError::linear_dependence(2, 3));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Lattice::from_matrix(vec![]).is_err());
    }

    #[test]
    fn test_orthogonality_defect() {
        let identity = Lattice::from_matrix(vec![vec![1, 0], vec![0, 1]]).unwrap();
        assert!((identity.orthogonality_defect().unwrap() - 1.0).abs() < 1e-12);

        let skewed = Lattice::from_matrix(vec![vec![1, 0], vec![100, 1]]).unwrap();
        assert!(skewed.orthogonality_defect().unwrap() > 50.0);
    }

    #[test]
    fn test_parse_formats() {
        let json_obj = Lattice::parse(r#"{"rows": [[2, 0], [1, 3]]}"#).unwrap();
        let json_arr = Lattice::parse("[[2, 0], [1, 3]]").unwrap();
        let text = Lattice::parse("# basis\n[[2 0]\n [1 3]]\n").unwrap();
        assert_eq!(json_obj, json_arr);
        assert_eq!(json_arr, text);
    }

    #[test]
    fn test_parse_error() {
        let err = Lattice::parse("1 2\n3 x\n").unwrap_err();
        assert!(matches!(err, LatticeError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let lattice = Lattice::from_matrix(reference_rows()).unwrap();
        let path = std::env::temp_dir().join(format!("ggh_lattice_{}.json", std::process::id()));
        lattice.save_to_file(&path).unwrap();
        let loaded = Lattice::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(lattice, loaded);
    }
}
