//! # Determinant Module
//!
//! Exact integer determinants. Entries are lifted into [`BigInt`] so that no
//! intermediate step can overflow or round, whatever the matrix size.
//!
//! Two strategies are available and picked by [`DeterminantStrategy::select`]:
//! recursive cofactor expansion for small matrices, Bareiss fraction-free
//! elimination above [`RECURSIVE_MAX_SIZE`].

use crate::errors::HillCryptoError;
use crate::ring::Matrix;
use crate::ring::matrix_ops::{ensure_square, submatrix};

use log::debug;
use num_bigint::BigInt;
use num_traits::{One, Zero};

use serde::{Deserialize, Serialize};

/// Largest size handled by cofactor expansion when the strategy is picked automatically.
pub const RECURSIVE_MAX_SIZE: usize = 5;

type BigMatrix = Vec<Vec<BigInt>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeterminantStrategy {
    /// Recursive Laplace expansion along the first row, O(n!).
    Cofactor,
    /// Bareiss fraction-free elimination, O(n³) on big integers.
    Bareiss,
}

impl DeterminantStrategy {
    /// Picks the strategy for an n×n matrix.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::determinant::DeterminantStrategy;
    /// assert_eq!(DeterminantStrategy::select(3), DeterminantStrategy::Cofactor);
    /// assert_eq!(DeterminantStrategy::select(8), DeterminantStrategy::Bareiss);
    /// ```
    pub fn select(size: usize) -> Self {
        if size <= RECURSIVE_MAX_SIZE {
            DeterminantStrategy::Cofactor
        } else {
            DeterminantStrategy::Bareiss
        }
    }
}

/// Computes the exact determinant of a square integer matrix.
///
/// The 0×0 matrix has determinant 1.
///
/// # Errors
///
/// Returns `HillCryptoError::DimensionMismatch` if the matrix is not square.
///
/// # Example
///
/// ```
/// # use hill_crypto::determinant::determinant;
/// # use num_bigint::BigInt;
/// let det = determinant(&vec![vec![1, 2], vec![3, 5]]).unwrap();
/// assert_eq!(det, BigInt::from(-1));
/// ```
pub fn determinant(matrix: &Matrix) -> Result<BigInt, HillCryptoError> {
    let n = ensure_square(matrix)?;
    let strategy = DeterminantStrategy::select(n);
    debug!("Determinant of {}x{} matrix via {:?}", n, n, strategy);

    determinant_with(matrix, strategy)
}

/// Computes the exact determinant with an explicitly chosen strategy.
pub fn determinant_with(
    matrix: &Matrix,
    strategy: DeterminantStrategy,
) -> Result<BigInt, HillCryptoError> {
    ensure_square(matrix)?;
    let lifted = lift(matrix);

    Ok(match strategy {
        DeterminantStrategy::Cofactor => cofactor_expansion(&lifted),
        DeterminantStrategy::Bareiss => bareiss(lifted),
    })
}

/// Determinant of the minor obtained by deleting row `row` and column `col`.
///
/// # Errors
///
/// Returns `HillCryptoError::DimensionMismatch` if the matrix is not square
/// or the indices fall outside it.
pub fn matrix_minor(matrix: &Matrix, row: usize, col: usize) -> Result<BigInt, HillCryptoError> {
    let n = ensure_square(matrix)?;
    if row >= n || col >= n {
        return Err(HillCryptoError::DimensionMismatch(format!(
            "Minor ({}, {}) is outside a {}x{} matrix",
            row, col, n, n
        )));
    }

    determinant(&submatrix(matrix, row, col))
}

fn lift(matrix: &Matrix) -> BigMatrix {
    matrix
        .iter()
        .map(|row| row.iter().map(|&v| BigInt::from(v)).collect())
        .collect()
}

fn cofactor_expansion(m: &[Vec<BigInt>]) -> BigInt {
    match m.len() {
        0 => BigInt::one(),
        1 => m[0][0].clone(),
        2 => &m[0][0] * &m[1][1] - &m[0][1] * &m[1][0],
        n => {
            let mut det = BigInt::zero();
            for (j, entry) in m[0].iter().enumerate() {
                if entry.is_zero() {
                    continue;
                }
                let minor: BigMatrix = m[1..n]
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|&(c, _)| c != j)
                            .map(|(_, v)| v.clone())
                            .collect()
                    })
                    .collect();
                let term = entry * cofactor_expansion(&minor);
                if j % 2 == 0 {
                    det += term;
                } else {
                    det -= term;
                }
            }
            det
        }
    }
}

fn bareiss(mut m: BigMatrix) -> BigInt {
    let n = m.len();
    if n == 0 {
        return BigInt::one();
    }

    let mut negate = false;
    let mut prev_pivot = BigInt::one();

    for k in 0..n - 1 {
        let Some(pivot_row) = (k..n).find(|&i| !m[i][k].is_zero()) else {
            // whole column at or below the diagonal is zero
            return BigInt::zero();
        };
        if pivot_row != k {
            m.swap(k, pivot_row);
            negate = !negate;
        }

        let pivot = m[k][k].clone();
        let pivot_line = m[k].clone();
        for row in m.iter_mut().skip(k + 1) {
            let factor = row[k].clone();
            for j in k + 1..n {
                let numerator = &row[j] * &pivot - &factor * &pivot_line[j];
                // exact: Sylvester's identity guarantees divisibility
                row[j] = numerator / &prev_pivot;
            }
            row[k] = BigInt::zero();
        }
        prev_pivot = pivot;
    }

    let det = m[n - 1][n - 1].clone();
    if negate { -det } else { det }
}
