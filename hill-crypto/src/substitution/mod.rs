//! # Substitution Module
//!
//! Permutations of `0..s` used by the modified cipher to scramble each encrypted block.
//! A substitution is stored as its mapping array: position `i` holds the image of `i`.

use crate::errors::HillCryptoError;
use crate::ring::{Vector, lcm};

use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A bijection on `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Substitution {
    mapping: Vec<usize>,
}

impl Substitution {
    /// Wraps a raw mapping after validation.
    ///
    /// # Errors
    ///
    /// See [`validate_substitution`].
    pub fn try_from_mapping(raw: &[i64]) -> Result<Self, HillCryptoError> {
        validate_substitution(raw, None)?;
        Ok(Self {
            mapping: raw.iter().map(|&v| v as usize).collect(),
        })
    }

    pub fn identity(size: usize) -> Result<Self, HillCryptoError> {
        ensure_size(size)?;
        Ok(Self {
            mapping: (0..size).collect(),
        })
    }

    /// Cyclic shift `i -> (i + shift) mod size`; negative shifts go left.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::substitution::Substitution;
    /// let sub = Substitution::shift(4, -1).unwrap();
    /// assert_eq!(sub.mapping(), &[3, 0, 1, 2]);
    /// ```
    pub fn shift(size: usize, shift: i64) -> Result<Self, HillCryptoError> {
        ensure_size(size)?;
        let offset = shift.rem_euclid(size as i64) as usize;
        Ok(Self {
            mapping: (0..size).map(|i| (i + offset) % size).collect(),
        })
    }

    /// Full reversal `i -> size - 1 - i`.
    pub fn reverse(size: usize) -> Result<Self, HillCryptoError> {
        ensure_size(size)?;
        Ok(Self {
            mapping: (0..size).rev().collect(),
        })
    }

    /// Uniformly random permutation (Fisher-Yates) drawn from `rng`.
    pub fn random<R>(size: usize, rng: &mut R) -> Result<Self, HillCryptoError>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        ensure_size(size)?;
        let mut mapping: Vec<usize> = (0..size).collect();
        mapping.shuffle(rng);
        Ok(Self { mapping })
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Always `false`: every constructor rejects the empty permutation.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// The unique `q` with `q[p[i]] = i`.
    pub fn invert(&self) -> Self {
        let mut inverse = vec![0; self.mapping.len()];
        for (i, &image) in self.mapping.iter().enumerate() {
            inverse[image] = i;
        }
        Self { mapping: inverse }
    }

    /// Maps each value `x` to `p[x mod len]`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::substitution::Substitution;
    /// let sub = Substitution::reverse(3).unwrap();
    /// assert_eq!(sub.apply(&[0, 1, 2, 4, -1]), vec![2, 1, 0, 1, 0]);
    /// ```
    pub fn apply(&self, data: &[i64]) -> Vector {
        let len = self.mapping.len() as i64;
        data.iter()
            .map(|&x| self.mapping[x.rem_euclid(len) as usize] as i64)
            .collect()
    }

    /// Applies the substitution `times` times in sequence.
    pub fn apply_multiple(&self, data: &[i64], times: usize) -> Vector {
        let mut out = data.to_vec();
        for _ in 0..times {
            out = self.apply(&out);
        }
        out
    }

    /// `(self ∘ other)[i] = self[other[i]]`, i.e. `other` is applied first.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidParameter` if the sizes differ.
    pub fn compose(&self, other: &Substitution) -> Result<Self, HillCryptoError> {
        if self.len() != other.len() {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Cannot compose substitutions of sizes {} and {}",
                self.len(),
                other.len()
            )));
        }
        Ok(Self {
            mapping: other.mapping.iter().map(|&i| self.mapping[i]).collect(),
        })
    }

    /// Multiplicative order: the LCM of all cycle lengths.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::substitution::Substitution;
    /// // cycles (0 1) and (2 3 4)
    /// let sub = Substitution::try_from_mapping(&[1, 0, 3, 4, 2]).unwrap();
    /// assert_eq!(sub.order(), 6);
    /// ```
    pub fn order(&self) -> u64 {
        let mut visited = vec![false; self.mapping.len()];
        let mut order = 1u64;

        for start in 0..self.mapping.len() {
            if visited[start] {
                continue;
            }
            let mut cycle = 0u64;
            let mut current = start;
            while !visited[current] {
                visited[current] = true;
                current = self.mapping[current];
                cycle += 1;
            }
            order = lcm(order, cycle);
        }
        order
    }

    pub fn is_identity(&self) -> bool {
        self.mapping.iter().enumerate().all(|(i, &v)| i == v)
    }
}

fn ensure_size(size: usize) -> Result<(), HillCryptoError> {
    if size == 0 {
        return Err(HillCryptoError::InvalidParameter(
            "Substitution cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Checks that `raw` is a permutation of `0..raw.len()`, optionally of a given size.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidParameter` naming the first problem found:
/// emptiness, a size mismatch, an out-of-range value or a duplicate value.
pub fn validate_substitution(raw: &[i64], expected: Option<usize>) -> Result<(), HillCryptoError> {
    if raw.is_empty() {
        return Err(HillCryptoError::InvalidParameter(
            "Substitution cannot be empty".to_string(),
        ));
    }
    if let Some(size) = expected.filter(|&size| size != raw.len()) {
        return Err(HillCryptoError::InvalidParameter(format!(
            "Substitution size ({}) does not match the expected size ({})",
            raw.len(),
            size
        )));
    }

    let len = raw.len();
    let mut seen = vec![false; len];
    for (i, &value) in raw.iter().enumerate() {
        if value < 0 || value as usize >= len {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Substitution value {} at position {} is outside [0, {})",
                value, i, len
            )));
        }
        if std::mem::replace(&mut seen[value as usize], true) {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Substitution value {} appears more than once",
                value
            )));
        }
    }
    Ok(())
}

impl TryFrom<Vec<i64>> for Substitution {
    type Error = HillCryptoError;

    fn try_from(value: Vec<i64>) -> Result<Self, Self::Error> {
        Substitution::try_from_mapping(&value)
    }
}

impl From<Substitution> for Vec<i64> {
    fn from(value: Substitution) -> Self {
        value.mapping.into_iter().map(|v| v as i64).collect()
    }
}

/// Whitespace-separated images, e.g. `"2 0 1"`.
impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.mapping.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl FromStr for Substitution {
    type Err = HillCryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .split_whitespace()
            .map(|token| {
                token.parse::<i64>().map_err(|_| {
                    HillCryptoError::InvalidParameter(format!(
                        "Substitution contains a non-integer value {:?}",
                        token
                    ))
                })
            })
            .collect::<Result<Vec<i64>, _>>()?;
        Substitution::try_from_mapping(&raw)
    }
}

/// Named substitution presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstitutionTemplate {
    Identity,
    Reverse,
    ShiftForward,
    ShiftBackward,
    Random,
}

impl SubstitutionTemplate {
    pub const ALL: [SubstitutionTemplate; 5] = [
        SubstitutionTemplate::Identity,
        SubstitutionTemplate::Reverse,
        SubstitutionTemplate::ShiftForward,
        SubstitutionTemplate::ShiftBackward,
        SubstitutionTemplate::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubstitutionTemplate::Identity => "identity",
            SubstitutionTemplate::Reverse => "reverse",
            SubstitutionTemplate::ShiftForward => "shift_1",
            SubstitutionTemplate::ShiftBackward => "shift_-1",
            SubstitutionTemplate::Random => "random",
        }
    }

    /// Builds the template for an alphabet of `size` symbols.
    pub fn build<R>(self, size: usize, rng: &mut R) -> Result<Substitution, HillCryptoError>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        match self {
            SubstitutionTemplate::Identity => Substitution::identity(size),
            SubstitutionTemplate::Reverse => Substitution::reverse(size),
            SubstitutionTemplate::ShiftForward => Substitution::shift(size, 1),
            SubstitutionTemplate::ShiftBackward => Substitution::shift(size, -1),
            SubstitutionTemplate::Random => Substitution::random(size, rng),
        }
    }
}

impl FromStr for SubstitutionTemplate {
    type Err = HillCryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubstitutionTemplate::ALL
            .into_iter()
            .find(|t| t.name() == s.trim())
            .ok_or_else(|| {
                HillCryptoError::InvalidParameter(format!("Unknown substitution template {:?}", s))
            })
    }
}
