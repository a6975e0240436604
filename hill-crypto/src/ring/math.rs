//! Implementation of Z/mZ ops using modular arithmetic.

use crate::errors::HillCryptoError;

use super::mod_inverse;

use serde::{Deserialize, Serialize};

/// Represents the ring Z/mZ; `m` is the alphabet length for every cipher operation.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub modulus: u64,
}

impl Ring {
    /// Create a new Ring with the given modulus.
    ///
    /// The modulus must be greater than 1.
    pub fn try_with(modulus: u64) -> Result<Self, HillCryptoError> {
        if modulus <= 1 || modulus > i64::MAX as u64 {
            return Err(HillCryptoError::InvalidModulus(format!(
                "Modulus must be in [2, {}], got {}",
                i64::MAX,
                modulus
            )));
        }

        Ok(Ring { modulus })
    }

    /// Returns the modulus of the ring.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(26).unwrap();
    /// assert_eq!(ring.modulus(), 26);
    /// ```
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Normalizes a value to be within the range `[0, modulus - 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.normalize(15), 5);
    /// assert_eq!(ring.normalize(-3), 7);
    /// assert_eq!(ring.normalize(10), 0);
    /// ```
    pub fn normalize(&self, value: i64) -> i64 {
        value.rem_euclid(self.modulus as i64)
    }

    /// Computes `(a + b) mod modulus`.
    pub fn add(&self, a: i64, b: i64) -> i64 {
        let sum = self.normalize(a) as i128 + self.normalize(b) as i128;
        (sum % self.modulus as i128) as i64
    }

    /// Computes `(a - b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.sub(3, 5), 8);
    /// assert_eq!(ring.sub(-2, 3), 5);
    /// ```
    pub fn sub(&self, a: i64, b: i64) -> i64 {
        let diff = self.normalize(a) as i128 - self.normalize(b) as i128;
        diff.rem_euclid(self.modulus as i128) as i64
    }

    /// Computes `(a * b) mod modulus`.
    ///
    /// Uses `i128` internally to prevent overflow during multiplication before the modulo operation.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.mul(7, 5), 5);
    /// assert_eq!(ring.mul(-2, 6), 8);
    /// ```
    pub fn mul(&self, a: i64, b: i64) -> i64 {
        let product = self.normalize(a) as i128 * self.normalize(b) as i128;
        (product % self.modulus as i128) as i64
    }

    /// Computes the additive inverse `-a mod modulus`.
    pub fn neg(&self, a: i64) -> i64 {
        self.sub(0, a)
    }

    /// Computes `base^exp mod modulus` by square-and-multiply.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(23).unwrap();
    /// assert_eq!(ring.pow(5, 6), 8); // 15625 = 679 * 23 + 8
    /// assert_eq!(ring.pow(5, 0), 1);
    /// ```
    pub fn pow(&self, base: i64, mut exp: u64) -> i64 {
        let mut result = self.normalize(1);
        let mut acc = self.normalize(base);
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, acc);
            }
            acc = self.mul(acc, acc);
            exp >>= 1;
        }
        result
    }

    /// Computes the modular multiplicative inverse `a^-1 mod modulus`.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::NoInverse` if `gcd(a, modulus) != 1` or `a ≡ 0`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.inv(3).unwrap(), 7);
    /// assert!(ring.inv(2).is_err());
    /// assert!(ring.inv(0).is_err());
    /// ```
    pub fn inv(&self, a: i64) -> Result<i64, HillCryptoError> {
        mod_inverse(a, self.modulus as i64)
    }

    /// Returns `true` if `a` is a unit of the ring.
    pub fn is_unit(&self, a: i64) -> bool {
        super::is_coprime(self.normalize(a), self.modulus as i64)
    }
}
