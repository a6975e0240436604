//! # Search Module
//!
//! Exhaustive key search against a known plaintext. Every n×n matrix with entries
//! in `[0, value_range)` is tried; modified mode also walks noise lengths and
//! cyclic-shift substitutions. Candidates are spread over rayon workers which stop
//! early once the shared cancellation flag is raised.

use crate::alphabet::Alphabet;
use crate::cipher::{KeyMatrix, decrypt_modified};
use crate::errors::HillCryptoError;
use crate::substitution::Substitution;

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    Standard,
    /// Tries every noise length up to `max_noise` and every cyclic-shift substitution.
    Modified { max_noise: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub matrix_size: usize,
    /// Exclusive upper bound of matrix entries; capped at the alphabet size.
    pub value_range: i64,
    pub mode: SearchMode,
    /// How many best candidates are kept.
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            matrix_size: 2,
            value_range: 10,
            mode: SearchMode::Standard,
            top_k: 5,
        }
    }
}

impl SearchConfig {
    /// Modified-mode search with the narrower entry range it needs to stay tractable.
    pub fn modified(matrix_size: usize, max_noise: usize) -> Self {
        Self {
            matrix_size,
            value_range: 8,
            mode: SearchMode::Modified { max_noise },
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), HillCryptoError> {
        if self.matrix_size < 2 {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Search matrix size must be at least 2, got {}",
                self.matrix_size
            )));
        }
        if self.value_range < 1 {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Search value range must be positive, got {}",
                self.value_range
            )));
        }
        if self.top_k == 0 {
            return Err(HillCryptoError::InvalidParameter(
                "Search must keep at least one candidate".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub accuracy: f64,
    pub matrix: KeyMatrix,
    pub substitution: Option<Substitution>,
    pub noise_length: usize,
    pub decrypted: String,
}

/// Best candidates so far, ordered by accuracy; ties keep the earlier report first.
#[derive(Debug, Clone, Default)]
pub struct TopResults {
    limit: usize,
    candidates: Vec<Candidate>,
}

impl TopResults {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            candidates: Vec::with_capacity(limit + 1),
        }
    }

    pub fn insert(&mut self, candidate: Candidate) {
        let position = self
            .candidates
            .iter()
            .position(|c| c.accuracy < candidate.accuracy)
            .unwrap_or(self.candidates.len());
        if position >= self.limit {
            return;
        }
        self.candidates.insert(position, candidate);
        self.candidates.truncate(self.limit);
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub attempts: u64,
    pub candidates: Vec<Candidate>,
    pub cancelled: bool,
}

/// Position-wise similarity in percent, with a penalty for differing lengths.
///
/// `matches / min_len * (1 - |len_a - len_b| / max_len) * 100`, rounded to two decimals.
///
/// # Example
///
/// ```
/// # use hill_crypto::search::accuracy;
/// assert_eq!(accuracy("HELLO", "HELLO"), 100.0);
/// assert_eq!(accuracy("HELXO", "HELLO"), 80.0);
/// assert_eq!(accuracy("HELLO", "HELLOOOOOO"), 50.0);
/// assert_eq!(accuracy("", "HELLO"), 0.0);
/// ```
pub fn accuracy(decrypted: &str, expected: &str) -> f64 {
    let a: Vec<char> = decrypted.chars().collect();
    let b: Vec<char> = expected.chars().collect();
    let min_len = a.len().min(b.len());
    if min_len == 0 {
        return 0.0;
    }
    let max_len = a.len().max(b.len());

    let matches = a.iter().zip(&b).filter(|(x, y)| x == y).count();
    let length_penalty = 1.0 - a.len().abs_diff(b.len()) as f64 / max_len as f64;
    let score = matches as f64 / min_len as f64 * length_penalty * 100.0;

    (score * 100.0).round() / 100.0
}

/// Runs the exhaustive search.
///
/// Raising `cancel` stops all workers before their next candidate; the outcome then
/// holds what was found so far and `cancelled == true`.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidParameter` for an invalid configuration.
pub fn search(
    ciphertext: &str,
    expected: &str,
    alphabet: &Alphabet,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Result<SearchOutcome, HillCryptoError> {
    config.validate()?;

    let ring = alphabet.ring();
    let n = config.matrix_size;
    let value_range = config.value_range.min(ring.modulus() as i64);
    let numbers = alphabet.text_to_numbers(ciphertext);

    let variants: Vec<(Option<Substitution>, usize)> = match config.mode {
        SearchMode::Standard => vec![(None, 0)],
        SearchMode::Modified { max_noise } => {
            let mut variants = Vec::new();
            for noise_length in (0..=max_noise).filter(|&noise| noise < n) {
                for shift in 0..alphabet.len() {
                    variants.push((
                        Some(Substitution::shift(alphabet.len(), shift as i64)?),
                        noise_length,
                    ));
                }
            }
            variants
        }
    };

    debug!(
        "Searching {}x{} keys with entries < {} over {} variant(s): {:?} matrices each",
        n,
        n,
        value_range,
        variants.len(),
        (value_range as u64).checked_pow((n * n) as u32)
    );

    let attempts = AtomicU64::new(0);
    let top = Mutex::new(TopResults::with_limit(config.top_k));

    for (substitution, noise_length) in &variants {
        if cancel.load(Ordering::Relaxed) {
            break;
        }

        let finished = (0..n * n)
            .map(|_| 0..value_range)
            .multi_cartesian_product()
            .par_bridge()
            .try_for_each(|values| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                attempts.fetch_add(1, Ordering::Relaxed);

                let rows = values.chunks(n).map(<[i64]>::to_vec).collect();
                let Ok(matrix) = KeyMatrix::try_from_rows(rows) else {
                    return Some(());
                };
                if !matrix.is_invertible_mod(ring) {
                    return Some(());
                }
                let Ok(decrypted) =
                    decrypt_modified(&numbers, &matrix, ring, substitution.as_ref(), *noise_length)
                else {
                    return Some(());
                };

                let decrypted = alphabet.numbers_to_text(&decrypted);
                let score = accuracy(&decrypted, expected);
                if score > 0.0 {
                    top.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(Candidate {
                            accuracy: score,
                            matrix,
                            substitution: substitution.clone(),
                            noise_length: *noise_length,
                            decrypted,
                        });
                }
                Some(())
            });
        if finished.is_none() {
            break;
        }
    }

    let outcome = SearchOutcome {
        attempts: attempts.into_inner(),
        candidates: top
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_vec(),
        cancelled: cancel.load(Ordering::Relaxed),
    };
    debug!(
        "Search finished after {} attempts, best accuracy {:?}, cancelled: {}",
        outcome.attempts,
        outcome.candidates.first().map(|c| c.accuracy),
        outcome.cancelled
    );

    Ok(outcome)
}
