use crate::determinant::determinant;
use crate::errors::HillCryptoError;
use crate::inverse::{InverseReport, is_circulant, matrix_mod_inverse_with_report, reduce_big};
use crate::ring::matrix_ops::ensure_square;
use crate::ring::{Matrix, Ring};

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Square Hill key with non-negative entries, n >= 2.
///
/// Entries may exceed the modulus; every cipher operation reduces them mod m.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Matrix", into = "Matrix")]
pub struct KeyMatrix {
    rows: Matrix,
}

impl KeyMatrix {
    /// # Errors
    ///
    /// Returns `HillCryptoError::DimensionMismatch` for non-square input and
    /// `HillCryptoError::InvalidParameter` for n < 2 or negative entries.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::cipher::KeyMatrix;
    /// let key = KeyMatrix::try_from_rows(vec![vec![1, 2], vec![3, 5]]).unwrap();
    /// assert_eq!(key.size(), 2);
    /// assert!(KeyMatrix::try_from_rows(vec![vec![1]]).is_err());
    /// assert!(KeyMatrix::try_from_rows(vec![vec![1, -2], vec![3, 5]]).is_err());
    /// ```
    pub fn try_from_rows(rows: Matrix) -> Result<Self, HillCryptoError> {
        let n = ensure_square(&rows)?;
        if n < 2 {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Key matrix must be at least 2x2, got {}x{}",
                n, n
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if let Some(j) = row.iter().position(|&v| v < 0) {
                return Err(HillCryptoError::InvalidParameter(format!(
                    "Key matrix entry ({}, {}) is negative: {}",
                    i, j, row[j]
                )));
            }
        }

        Ok(Self { rows })
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &Matrix {
        &self.rows
    }

    pub fn into_rows(self) -> Matrix {
        self.rows
    }

    /// Exact integer determinant.
    pub fn determinant(&self) -> Result<BigInt, HillCryptoError> {
        determinant(&self.rows)
    }

    pub fn is_circulant(&self) -> bool {
        is_circulant(&self.rows)
    }

    /// `true` when `gcd(det mod m, m) = 1`.
    pub fn is_invertible_mod(&self, ring: &Ring) -> bool {
        self.determinant()
            .and_then(|det| reduce_big(&det, ring))
            .is_ok_and(|det| ring.is_unit(det))
    }

    /// Inverse modulo the ring's modulus.
    pub fn inverse_mod(&self, ring: &Ring) -> Result<Matrix, HillCryptoError> {
        self.inverse_with_report(ring).map(|(inverse, _)| inverse)
    }

    /// Inverse plus the strategy report of the inverse engine.
    pub fn inverse_with_report(
        &self,
        ring: &Ring,
    ) -> Result<(Matrix, InverseReport), HillCryptoError> {
        matrix_mod_inverse_with_report(&self.rows, ring)
    }
}

impl TryFrom<Matrix> for KeyMatrix {
    type Error = HillCryptoError;

    fn try_from(value: Matrix) -> Result<Self, Self::Error> {
        KeyMatrix::try_from_rows(value)
    }
}

impl From<KeyMatrix> for Matrix {
    fn from(value: KeyMatrix) -> Self {
        value.rows
    }
}

/// One row per line, entries separated by commas.
impl fmt::Display for KeyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(i64::to_string).collect();
            write!(f, "{}", line.join(","))?;
        }
        Ok(())
    }
}

impl FromStr for KeyMatrix {
    type Err = HillCryptoError;

    /// Parses comma-separated rows, ignoring blank lines and spaces around entries.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| {
                line.split(',')
                    .map(|token| {
                        token.trim().parse::<i64>().map_err(|_| {
                            HillCryptoError::InvalidParameter(format!(
                                "Key matrix row {} contains a non-integer value {:?}",
                                i,
                                token.trim()
                            ))
                        })
                    })
                    .collect::<Result<Vec<i64>, _>>()
            })
            .collect::<Result<Matrix, _>>()?;

        KeyMatrix::try_from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form() -> Result<(), HillCryptoError> {
        let key: KeyMatrix = "3, 3\n\n2,5\n".parse()?;
        assert_eq!(key.rows(), &vec![vec![3, 3], vec![2, 5]]);
        assert_eq!(key.to_string(), "3,3\n2,5");
        assert_eq!(key.to_string().parse::<KeyMatrix>()?, key);
        Ok(())
    }

    #[test]
    fn test_text_form_errors() {
        assert!(matches!(
            "1,2\n3,x".parse::<KeyMatrix>(),
            Err(HillCryptoError::InvalidParameter(msg)) if msg.contains("non-integer")
        ));
        assert!(matches!(
            "1,2,3\n4,5,6".parse::<KeyMatrix>(),
            Err(HillCryptoError::DimensionMismatch(_))
        ));
        assert!("".parse::<KeyMatrix>().is_err());
    }

    #[test]
    fn test_invertibility() -> Result<(), HillCryptoError> {
        let key = KeyMatrix::try_from_rows(vec![vec![1, 2], vec![3, 5]])?;
        assert_eq!(key.determinant()?, BigInt::from(-1));
        assert!(key.is_invertible_mod(&Ring::try_with(3)?));

        let singular = KeyMatrix::try_from_rows(vec![vec![2, 2], vec![2, 2]])?;
        assert!(!singular.is_invertible_mod(&Ring::try_with(4)?));
        assert!(matches!(
            singular.inverse_mod(&Ring::try_with(4)?),
            Err(HillCryptoError::SingularMatrix(_))
        ));

        // det = 26 is zero mod 26 but a unit mod 27
        let shared = KeyMatrix::try_from_rows(vec![vec![6, 2], vec![2, 5]])?;
        assert!(!shared.is_invertible_mod(&Ring::try_with(26)?));
        assert!(shared.is_invertible_mod(&Ring::try_with(27)?));
        Ok(())
    }

    #[test]
    fn test_serde_as_rows() -> Result<(), HillCryptoError> {
        let key = KeyMatrix::try_from_rows(vec![vec![1, 0], vec![1, 1]])?;
        assert_eq!(serde_json::to_string(&key)?, "[[1,0],[1,1]]");
        assert!(serde_json::from_str::<KeyMatrix>("[[1,2]]").is_err());
        Ok(())
    }
}
