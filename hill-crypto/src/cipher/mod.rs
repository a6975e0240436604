//! # Cipher Module
//!
//! Hill block transforms over Z/mZ.
//!
//! Standard mode multiplies each n-length block by the key matrix. Modified mode
//! reserves the last `noise_length` slots of every block for random noise and then
//! applies the substitution `block_index + 1` times to the product, so the same
//! plaintext block encrypts differently at every position.

pub mod hill_key;
pub mod key_matrix;

pub use hill_key::HillKey;
pub use key_matrix::KeyMatrix;

use crate::alphabet::Alphabet;
use crate::errors::HillCryptoError;
use crate::ring::matrix_ops::matrix_vector_mul;
use crate::ring::{Matrix, Ring, Vector};
use crate::substitution::Substitution;

use log::trace;
use rand::{CryptoRng, Rng};

/// Checks `noise_length < n`.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidParameter` otherwise.
pub fn validate_noise_length(noise_length: usize, size: usize) -> Result<(), HillCryptoError> {
    if noise_length >= size {
        return Err(HillCryptoError::InvalidParameter(format!(
            "Noise length ({}) must be less than the matrix size ({})",
            noise_length, size
        )));
    }
    Ok(())
}

fn validate_substitution_size(
    substitution: &Substitution,
    ring: &Ring,
) -> Result<(), HillCryptoError> {
    if substitution.len() as u64 != ring.modulus() {
        return Err(HillCryptoError::InvalidParameter(format!(
            "Substitution size ({}) does not match the alphabet size ({})",
            substitution.len(),
            ring.modulus()
        )));
    }
    Ok(())
}

fn multiply_blocks(matrix: &Matrix, numbers: &[i64], ring: &Ring) -> Result<Vector, HillCryptoError> {
    let n = matrix.len();
    let mut out = Vec::with_capacity(numbers.len());
    for (index, block) in numbers.chunks(n).enumerate() {
        let product = matrix_vector_mul(matrix, block, ring)?;
        trace!("Block {}: {:?} -> {:?}", index, block, product);
        out.extend(product);
    }
    Ok(out)
}

/// Pads with zeros to a multiple of n and multiplies every block by the key.
///
/// # Example
///
/// ```
/// # use hill_crypto::cipher::{KeyMatrix, encrypt_standard};
/// # use hill_crypto::ring::Ring;
/// let key = KeyMatrix::try_from_rows(vec![vec![1, 2], vec![3, 5]]).unwrap();
/// let ring = Ring::try_with(3).unwrap();
/// assert_eq!(encrypt_standard(&[0, 1], &key, &ring).unwrap(), vec![2, 2]);
/// assert_eq!(encrypt_standard(&[1], &key, &ring).unwrap(), vec![1, 0]);
/// ```
pub fn encrypt_standard(
    numbers: &[i64],
    key: &KeyMatrix,
    ring: &Ring,
) -> Result<Vector, HillCryptoError> {
    let n = key.size();
    let mut padded = numbers.to_vec();
    padded.resize(numbers.len().div_ceil(n) * n, 0);

    multiply_blocks(key.rows(), &padded, ring)
}

/// Multiplies every block by the inverse key.
///
/// The inverse is computed before anything else, so a singular key fails even on
/// malformed input.
///
/// # Errors
///
/// Returns `HillCryptoError::SingularMatrix` if the key has no inverse mod m and
/// `HillCryptoError::InvalidLength` if the length is not a multiple of n.
pub fn decrypt_standard(
    numbers: &[i64],
    key: &KeyMatrix,
    ring: &Ring,
) -> Result<Vector, HillCryptoError> {
    let inverse = key.inverse_mod(ring)?;
    ensure_whole_blocks(numbers, key.size())?;

    multiply_blocks(&inverse, numbers, ring)
}

fn ensure_whole_blocks(numbers: &[i64], n: usize) -> Result<(), HillCryptoError> {
    if numbers.len() % n != 0 {
        return Err(HillCryptoError::InvalidLength(format!(
            "Ciphertext length ({}) is not a multiple of the matrix size ({})",
            numbers.len(),
            n
        )));
    }
    Ok(())
}

/// Modified encryption: noise injection plus position-dependent iterated substitution.
///
/// Each block is `useful part | zero padding | noise`, where the useful part holds
/// `n - noise_length` plaintext symbols and padding only appears in the last block.
/// Empty input produces empty output.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidParameter` if `noise_length >= n` or the
/// substitution size differs from the modulus.
pub fn encrypt_modified<R>(
    numbers: &[i64],
    key: &KeyMatrix,
    ring: &Ring,
    substitution: &Substitution,
    noise_length: usize,
    rng: &mut R,
) -> Result<Vector, HillCryptoError>
where
    R: Rng + CryptoRng + ?Sized,
{
    let n = key.size();
    validate_noise_length(noise_length, n)?;
    validate_substitution_size(substitution, ring)?;

    let useful_size = n - noise_length;
    let modulus = ring.modulus() as i64;
    let mut out = Vec::with_capacity(numbers.len().div_ceil(useful_size) * n);
    // p^(index + 1) for the current block
    let mut power = substitution.clone();

    for (index, useful) in numbers.chunks(useful_size).enumerate() {
        let mut block = Vec::with_capacity(n);
        block.extend_from_slice(useful);
        block.resize(useful_size, 0);
        block.extend((0..noise_length).map(|_| rng.random_range(0..modulus)));

        let product = matrix_vector_mul(key.rows(), &block, ring)?;
        let substituted = power.apply(&product);
        power = substitution.compose(&power)?;
        trace!(
            "Block {}: {:?} -> {:?} -> {:?}",
            index, block, product, substituted
        );
        out.extend(substituted);
    }

    Ok(out)
}

/// Modified decryption.
///
/// Without a substitution this is [`decrypt_standard`] over the whole text and the
/// noise length is only validated. Otherwise every block has the inverse substitution
/// applied `block_index + 1` times, is multiplied by the inverse key, and loses its
/// trailing `noise_length` slots.
///
/// # Errors
///
/// Returns `HillCryptoError::SingularMatrix`, `HillCryptoError::InvalidLength` or
/// `HillCryptoError::InvalidParameter`, checked in that order.
pub fn decrypt_modified(
    numbers: &[i64],
    key: &KeyMatrix,
    ring: &Ring,
    substitution: Option<&Substitution>,
    noise_length: usize,
) -> Result<Vector, HillCryptoError> {
    let n = key.size();
    let inverse = key.inverse_mod(ring)?;
    ensure_whole_blocks(numbers, n)?;
    validate_noise_length(noise_length, n)?;

    let Some(substitution) = substitution else {
        return multiply_blocks(&inverse, numbers, ring);
    };
    validate_substitution_size(substitution, ring)?;

    let inverse_substitution = substitution.invert();
    let useful_size = n - noise_length;
    let mut out = Vec::with_capacity(numbers.len() / n * useful_size);
    let mut power = inverse_substitution.clone();

    for (index, block) in numbers.chunks(n).enumerate() {
        let unsubstituted = power.apply(block);
        power = inverse_substitution.compose(&power)?;
        let product = matrix_vector_mul(&inverse, &unsubstituted, ring)?;
        trace!(
            "Block {}: {:?} -> {:?} -> {:?}",
            index, block, unsubstituted, product
        );
        out.extend_from_slice(&product[..useful_size]);
    }

    Ok(out)
}

/// Encrypts text end to end: encode, transform, render.
///
/// With a substitution the modified mode is used, otherwise the standard one
/// (the noise length is then only validated).
pub fn encrypt_text<R>(
    text: &str,
    alphabet: &Alphabet,
    key: &KeyMatrix,
    substitution: Option<&Substitution>,
    noise_length: usize,
    rng: &mut R,
) -> Result<String, HillCryptoError>
where
    R: Rng + CryptoRng + ?Sized,
{
    let numbers = alphabet.text_to_numbers(text);
    let ring = alphabet.ring();

    let encrypted = match substitution {
        Some(substitution) => {
            encrypt_modified(&numbers, key, ring, substitution, noise_length, rng)?
        }
        None => {
            validate_noise_length(noise_length, key.size())?;
            encrypt_standard(&numbers, key, ring)?
        }
    };

    Ok(alphabet.numbers_to_text(&encrypted))
}

/// Decrypts text end to end; characters outside the alphabet are dropped first.
pub fn decrypt_text(
    text: &str,
    alphabet: &Alphabet,
    key: &KeyMatrix,
    substitution: Option<&Substitution>,
    noise_length: usize,
) -> Result<String, HillCryptoError> {
    let numbers = alphabet.text_to_numbers(text);
    let decrypted = decrypt_modified(&numbers, key, alphabet.ring(), substitution, noise_length)?;

    Ok(alphabet.numbers_to_text(&decrypted))
}
