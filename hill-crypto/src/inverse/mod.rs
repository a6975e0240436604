//! # Inverse Module
//!
//! Builds `M⁻¹ mod m` for a square key matrix. Three strategies exist and all of
//! them produce the same matrix whenever more than one applies:
//!
//! * [`InverseStrategy::Circulant`] computes only the first column of cofactors
//!   and derives the rest by cyclic shifts.
//! * [`InverseStrategy::GaussJordan`] reduces `[M | I]` with modular pivots.
//! * [`InverseStrategy::Adjugate`] computes every cofactor through a minor.
//!
//! [`InverseStrategy::select`] is the single dispatch decision; every call
//! returns an [`InverseReport`] describing what was detected and used.

use crate::determinant::{determinant, matrix_minor};
use crate::errors::HillCryptoError;
use crate::ring::matrix_ops::{ensure_square, identity_matrix, reduce_matrix, scale_matrix, transpose};
use crate::ring::{Matrix, Ring, extended_gcd};

use log::debug;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

use serde::{Deserialize, Serialize};

/// Largest non-circulant size inverted through the adjugate.
pub const ADJUGATE_MAX_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixShape {
    General,
    /// Row `i` equals row 0 cyclically shifted right by `i`.
    Circulant,
}

impl MatrixShape {
    pub fn detect(matrix: &Matrix) -> Self {
        if is_circulant(matrix) {
            MatrixShape::Circulant
        } else {
            MatrixShape::General
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InverseStrategy {
    Circulant,
    GaussJordan,
    Adjugate,
}

impl InverseStrategy {
    /// Chooses the inversion strategy from the matrix size and detected shape.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::inverse::{InverseStrategy, MatrixShape};
    /// assert_eq!(InverseStrategy::select(9, MatrixShape::Circulant), InverseStrategy::Circulant);
    /// assert_eq!(InverseStrategy::select(9, MatrixShape::General), InverseStrategy::GaussJordan);
    /// assert_eq!(InverseStrategy::select(3, MatrixShape::General), InverseStrategy::Adjugate);
    /// ```
    pub fn select(size: usize, shape: MatrixShape) -> Self {
        match shape {
            MatrixShape::Circulant => InverseStrategy::Circulant,
            MatrixShape::General if size > ADJUGATE_MAX_SIZE => InverseStrategy::GaussJordan,
            MatrixShape::General => InverseStrategy::Adjugate,
        }
    }
}

/// What the inverse routine detected and did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InverseReport {
    pub size: usize,
    pub modulus: u64,
    pub shape: MatrixShape,
    pub strategy: InverseStrategy,
    /// Exact determinant; Gauss-Jordan never computes it.
    pub determinant: Option<BigInt>,
    /// `det⁻¹ mod m` when the determinant was computed.
    pub determinant_inverse: Option<i64>,
}

/// Checks whether every row is row 0 cyclically shifted right by its index.
///
/// # Example
///
/// ```
/// # use hill_crypto::inverse::is_circulant;
/// assert!(is_circulant(&vec![vec![1, 2, 3], vec![3, 1, 2], vec![2, 3, 1]]));
/// assert!(!is_circulant(&vec![vec![1, 2, 3], vec![2, 3, 1], vec![3, 1, 2]]));
/// ```
pub fn is_circulant(matrix: &Matrix) -> bool {
    let n = matrix.len();
    if n == 0 || matrix.iter().any(|row| row.len() != n) {
        return false;
    }
    let first = &matrix[0];

    matrix
        .iter()
        .enumerate()
        .skip(1)
        .all(|(i, row)| (0..n).all(|j| row[j] == first[(j + n - i) % n]))
}

/// Computes `matrix⁻¹ mod m`.
///
/// # Errors
///
/// Returns `HillCryptoError::SingularMatrix` when the determinant is not a unit mod m and
/// `HillCryptoError::DimensionMismatch` for non-square or empty input.
pub fn matrix_mod_inverse(matrix: &Matrix, ring: &Ring) -> Result<Matrix, HillCryptoError> {
    matrix_mod_inverse_with_report(matrix, ring).map(|(inverse, _)| inverse)
}

/// Computes `matrix⁻¹ mod m` and reports which strategy produced it.
pub fn matrix_mod_inverse_with_report(
    matrix: &Matrix,
    ring: &Ring,
) -> Result<(Matrix, InverseReport), HillCryptoError> {
    let n = ensure_square(matrix)?;
    let shape = MatrixShape::detect(matrix);
    let strategy = InverseStrategy::select(n, shape);
    debug!(
        "Inverting {}x{} matrix mod {}: shape {:?}, strategy {:?}",
        n,
        n,
        ring.modulus(),
        shape,
        strategy
    );

    invert_with(matrix, ring, strategy)
}

/// Inverts with an explicit strategy.
///
/// # Errors
///
/// Besides the errors of [`matrix_mod_inverse`], returns
/// `HillCryptoError::InvalidParameter` if the circulant strategy is requested for a
/// matrix that is not circulant.
pub fn invert_with(
    matrix: &Matrix,
    ring: &Ring,
    strategy: InverseStrategy,
) -> Result<(Matrix, InverseReport), HillCryptoError> {
    let n = ensure_square(matrix)?;
    if n == 0 {
        return Err(HillCryptoError::DimensionMismatch(
            "Cannot invert an empty matrix".into(),
        ));
    }
    let shape = MatrixShape::detect(matrix);

    let mut report = InverseReport {
        size: n,
        modulus: ring.modulus(),
        shape,
        strategy,
        determinant: None,
        determinant_inverse: None,
    };

    let inverse = match strategy {
        InverseStrategy::Circulant => {
            if shape != MatrixShape::Circulant {
                return Err(HillCryptoError::InvalidParameter(
                    "Circulant inversion requested for a non-circulant matrix".into(),
                ));
            }
            let (det, det_inv) = unit_determinant(matrix, ring)?;
            report.determinant = Some(det);
            report.determinant_inverse = Some(det_inv);
            circulant_inverse(matrix, det_inv, ring)?
        }
        InverseStrategy::Adjugate => {
            let (det, det_inv) = unit_determinant(matrix, ring)?;
            report.determinant = Some(det);
            report.determinant_inverse = Some(det_inv);
            adjugate_inverse(matrix, det_inv, ring)?
        }
        InverseStrategy::GaussJordan => gauss_jordan_inverse(matrix, ring)?,
    };

    Ok((inverse, report))
}

/// Reduces an exact integer into `[0, m)`.
pub(crate) fn reduce_big(value: &BigInt, ring: &Ring) -> Result<i64, HillCryptoError> {
    value
        .mod_floor(&BigInt::from(ring.modulus()))
        .to_i64()
        .ok_or_else(|| {
            HillCryptoError::InternalError(format!(
                "Reduced value of {} does not fit into i64",
                value
            ))
        })
}

/// Computes the exact determinant and its inverse mod m.
fn unit_determinant(matrix: &Matrix, ring: &Ring) -> Result<(BigInt, i64), HillCryptoError> {
    let det = determinant(matrix)?;
    let det_mod = reduce_big(&det, ring)?;

    let det_inv = ring.inv(det_mod).map_err(|_| {
        HillCryptoError::SingularMatrix(format!(
            "Determinant {} (≡ {} mod {}) has no inverse modulo {}",
            det,
            det_mod,
            ring.modulus(),
            ring.modulus()
        ))
    })?;

    Ok((det, det_inv))
}

fn signed_minor(matrix: &Matrix, row: usize, col: usize, ring: &Ring) -> Result<i64, HillCryptoError> {
    let minor = matrix_minor(matrix, row, col)?;
    let signed = if (row + col) % 2 == 0 { minor } else { -minor };
    reduce_big(&signed, ring)
}

fn adjugate_inverse(matrix: &Matrix, det_inv: i64, ring: &Ring) -> Result<Matrix, HillCryptoError> {
    let n = matrix.len();
    let mut cofactors = vec![vec![0i64; n]; n];
    for (i, row) in cofactors.iter_mut().enumerate() {
        for (j, cofactor) in row.iter_mut().enumerate() {
            *cofactor = signed_minor(matrix, i, j, ring)?;
        }
    }

    Ok(scale_matrix(&transpose(&cofactors), det_inv, ring))
}

fn circulant_inverse(matrix: &Matrix, det_inv: i64, ring: &Ring) -> Result<Matrix, HillCryptoError> {
    let n = matrix.len();
    let first_column = (0..n)
        .map(|i| signed_minor(matrix, i, 0, ring))
        .collect::<Result<Vec<i64>, _>>()?;

    // the cofactor matrix of a circulant is circulant as well
    let cofactors: Matrix = (0..n)
        .map(|i| (0..n).map(|j| first_column[(i + n - j) % n]).collect())
        .collect();

    Ok(scale_matrix(&transpose(&cofactors), det_inv, ring))
}

/// Gauss-Jordan on `[M | I]` over Z/mZ; the right half ends up as `M⁻¹`.
fn gauss_jordan_inverse(matrix: &Matrix, ring: &Ring) -> Result<Matrix, HillCryptoError> {
    let n = matrix.len();
    let mut mat = reduce_matrix(matrix, ring);
    let mut inv = identity_matrix(n);

    for i in 0..n {
        unit_pivot(&mut mat, &mut inv, i, ring)?;

        // normalize row i
        let inv_ai = ring.inv(mat[i][i]).map_err(|e| {
            HillCryptoError::SingularMatrix(format!("Pivot in column {} is not a unit: {}", i, e))
        })?;
        for c in 0..n {
            mat[i][c] = ring.mul(mat[i][c], inv_ai);
            inv[i][c] = ring.mul(inv[i][c], inv_ai);
        }

        // eliminate all other rows
        for r in 0..n {
            if r == i {
                continue;
            }
            let factor = mat[r][i];
            if factor != 0 {
                for c in 0..n {
                    mat[r][c] = ring.sub(mat[r][c], ring.mul(factor, mat[i][c]));
                    inv[r][c] = ring.sub(inv[r][c], ring.mul(factor, inv[i][c]));
                }
            }
        }
    }

    Ok(inv)
}

/// Moves a unit into `mat[col][col]`.
///
/// Over a composite modulus a column can hold only zero divisors while the matrix is
/// still invertible (e.g. `2` and `3` mod 6). In that case the rows are folded together
/// with determinant-one row operations until the pivot is the gcd of the column.
fn unit_pivot(
    mat: &mut Matrix,
    inv: &mut Matrix,
    col: usize,
    ring: &Ring,
) -> Result<(), HillCryptoError> {
    let n = mat.len();

    if let Some(row) = (col..n).find(|&r| mat[r][col] != 0 && ring.is_unit(mat[r][col])) {
        mat.swap(col, row);
        inv.swap(col, row);
        return Ok(());
    }

    let Some(first) = (col..n).find(|&r| mat[r][col] != 0) else {
        return Err(HillCryptoError::SingularMatrix(format!(
            "Column {} has no non-zero entry mod {} at or below the diagonal",
            col,
            ring.modulus()
        )));
    };
    mat.swap(col, first);
    inv.swap(col, first);

    for r in col + 1..n {
        let (x, y) = (mat[col][col], mat[r][col]);
        if y == 0 {
            continue;
        }
        // [row_col; row_r] <- [[s, t], [-y/g, x/g]] · [row_col; row_r]
        let (g, s, t) = extended_gcd(x, y);
        let (xg, yg) = (x / g, y / g);
        for rows in [&mut *mat, &mut *inv] {
            for c in 0..n {
                let (p, q) = (rows[col][c], rows[r][c]);
                rows[col][c] = ring.add(ring.mul(s, p), ring.mul(t, q));
                rows[r][c] = ring.sub(ring.mul(xg, q), ring.mul(yg, p));
            }
        }
        if ring.is_unit(mat[col][col]) {
            return Ok(());
        }
    }

    if ring.is_unit(mat[col][col]) {
        Ok(())
    } else {
        Err(HillCryptoError::SingularMatrix(format!(
            "No invertible pivot mod {} in column {}",
            ring.modulus(),
            col
        )))
    }
}
