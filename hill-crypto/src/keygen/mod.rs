//! # Keygen Module
//!
//! Key-matrix generation: uniformly random invertible matrices, circulant matrices
//! from a first row, and circulant matrices derived from a discrete-log signature.

use crate::cipher::KeyMatrix;
use crate::errors::HillCryptoError;
use crate::ring::{Ring, is_prime};

use log::debug;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// How many random matrices [`random_invertible`] draws before giving up.
pub const MAX_RANDOM_ATTEMPTS: usize = 10_000;

/// Exponents of the first circulant row are reduced modulo this value.
pub const EXPONENT_MODULUS: u64 = 1000;

/// Draws matrices with entries in `[0, m)` until one is invertible mod m.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidParameter` if `size < 2` or no invertible matrix
/// was found within [`MAX_RANDOM_ATTEMPTS`] draws.
pub fn random_invertible<R>(
    size: usize,
    ring: &Ring,
    rng: &mut R,
) -> Result<KeyMatrix, HillCryptoError>
where
    R: Rng + CryptoRng + ?Sized,
{
    if size < 2 {
        return Err(HillCryptoError::InvalidParameter(format!(
            "Key matrix must be at least 2x2, got {}x{}",
            size, size
        )));
    }
    let modulus = ring.modulus() as i64;

    for attempt in 1..=MAX_RANDOM_ATTEMPTS {
        let rows = (0..size)
            .map(|_| (0..size).map(|_| rng.random_range(0..modulus)).collect())
            .collect();
        let candidate = KeyMatrix::try_from_rows(rows)?;
        if candidate.is_invertible_mod(ring) {
            debug!(
                "Random {}x{} key invertible mod {} after {} attempt(s)",
                size,
                size,
                ring.modulus(),
                attempt
            );
            return Ok(candidate);
        }
    }

    Err(HillCryptoError::InvalidParameter(format!(
        "No invertible {}x{} matrix mod {} found in {} attempts",
        size,
        size,
        ring.modulus(),
        MAX_RANDOM_ATTEMPTS
    )))
}

/// Builds the circulant matrix whose row `i` is `row` shifted right by `i`.
///
/// # Example
///
/// ```
/// # use hill_crypto::keygen::circulant_from_row;
/// let key = circulant_from_row(&[1, 2, 3]).unwrap();
/// assert_eq!(key.rows(), &vec![vec![1, 2, 3], vec![3, 1, 2], vec![2, 3, 1]]);
/// assert!(key.is_circulant());
/// ```
pub fn circulant_from_row(row: &[i64]) -> Result<KeyMatrix, HillCryptoError> {
    let n = row.len();
    let rows = (0..n)
        .map(|i| (0..n).map(|j| row[(j + n - i) % n]).collect())
        .collect();
    KeyMatrix::try_from_rows(rows)
}

/// Public parameters and private key of the signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParams {
    pub alpha: u64,
    /// Prime alphabet size `p`.
    pub modulus: u64,
    pub private_key: u64,
    /// Extra matrix rows reserved for noise symbols.
    pub noise_size: usize,
}

/// Output of [`SignatureParams::sign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Public key `alpha^private_key mod p`.
    pub beta: i64,
    /// `alpha^r mod p`, handed to the receiver.
    pub signature: i64,
    /// Shared secret `beta^r mod p`; fixes the matrix size.
    pub secret: i64,
}

impl SignatureParams {
    /// Validates the parameters.
    ///
    /// # Constraints
    /// * `alpha > 0`
    /// * `modulus` is prime
    /// * `1 < private_key < modulus - 1`
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidParameter` naming the violated constraint.
    pub fn try_new(
        alpha: u64,
        modulus: u64,
        private_key: u64,
        noise_size: usize,
    ) -> Result<Self, HillCryptoError> {
        if alpha == 0 {
            return Err(HillCryptoError::InvalidParameter(
                "Alpha must be positive".to_string(),
            ));
        }
        if !is_prime(modulus) {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Alphabet size {} must be prime",
                modulus
            )));
        }
        if private_key <= 1 || private_key >= modulus - 1 {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Private key must satisfy 1 < k < {}, got {}",
                modulus - 1,
                private_key
            )));
        }

        Ok(Self {
            alpha,
            modulus,
            private_key,
            noise_size,
        })
    }

    fn ring(&self) -> Result<Ring, HillCryptoError> {
        Ring::try_with(self.modulus)
    }

    pub fn beta(&self) -> Result<i64, HillCryptoError> {
        let ring = self.ring()?;
        Ok(ring.pow((self.alpha % self.modulus) as i64, self.private_key))
    }

    /// Signs with a fresh ephemeral exponent `r` drawn from `[2, p - 2]`.
    pub fn sign<R>(&self, rng: &mut R) -> Result<Signature, HillCryptoError>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        if self.modulus < 5 {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Alphabet size {} leaves no room for the ephemeral exponent",
                self.modulus
            )));
        }
        let r = rng.random_range(2..=self.modulus - 2);
        self.sign_with_exponent(r)
    }

    /// Deterministic signing with a given ephemeral exponent.
    pub fn sign_with_exponent(&self, r: u64) -> Result<Signature, HillCryptoError> {
        let ring = self.ring()?;
        let beta = self.beta()?;

        Ok(Signature {
            beta,
            signature: ring.pow((self.alpha % self.modulus) as i64, r),
            secret: ring.pow(beta, r),
        })
    }

    /// Receiver side: `secret = signature^private_key mod p`.
    pub fn secret_from_signature(&self, signature: i64) -> Result<i64, HillCryptoError> {
        let ring = self.ring()?;
        Ok(ring.pow(signature, self.private_key))
    }

    /// Recovers the shared secret from `signature` and builds the key matrix.
    pub fn matrix_from_signature(&self, signature: i64) -> Result<KeyMatrix, HillCryptoError> {
        let secret = self.secret_from_signature(signature)?;
        self.matrix_for_secret(secret)
    }

    /// Circulant key of size `secret + noise_size` with first row
    /// `alpha^(secret^i mod 1000) mod p`.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidParameter` if the size is below 2.
    pub fn matrix_for_secret(&self, secret: i64) -> Result<KeyMatrix, HillCryptoError> {
        let ring = self.ring()?;
        let exponents = Ring::try_with(EXPONENT_MODULUS)?;
        let size = usize::try_from(secret)
            .ok()
            .and_then(|secret| secret.checked_add(self.noise_size))
            .unwrap_or(0);
        if size < 2 {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Secret {} with noise {} gives a matrix smaller than 2x2",
                secret, self.noise_size
            )));
        }
        debug!(
            "Deriving {}x{} circulant key from secret {} mod {}",
            size, size, secret, self.modulus
        );

        let alpha = (self.alpha % self.modulus) as i64;
        let first_row: Vec<i64> = (0..size as u64)
            .map(|i| ring.pow(alpha, exponents.pow(secret, i) as u64))
            .collect();

        circulant_from_row(&first_row)
    }
}
