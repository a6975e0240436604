//! # Alphabet Module
//!
//! Bidirectional mapping between characters and indices `0..m`, where `m` is the
//! alphabet length and the modulus of every cipher operation.

use crate::errors::HillCryptoError;
use crate::ring::{Ring, Vector};

use serde::{Deserialize, Serialize};

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// How incoming text is case-folded before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseMode {
    /// The alphabet only has uppercase letters.
    Upper,
    /// The alphabet only has lowercase letters.
    Lower,
    /// Mixed or caseless alphabet, text is looked up as is.
    Preserve,
}

impl CaseMode {
    /// Derives the folding policy from the alphabet composition.
    pub fn derive(symbols: &[char]) -> Self {
        let mut has_upper = false;
        let mut has_lower = false;

        for &c in symbols {
            if c.is_uppercase() && single(c.to_lowercase()).is_some_and(|l| symbols.contains(&l)) {
                return CaseMode::Preserve;
            }
            has_upper |= c.is_uppercase();
            has_lower |= c.is_lowercase();
        }

        match (has_upper, has_lower) {
            (true, false) => CaseMode::Upper,
            (false, true) => CaseMode::Lower,
            _ => CaseMode::Preserve,
        }
    }

    /// Applies the policy to one character; `None` when folding yields several characters.
    pub fn fold(self, c: char) -> Option<char> {
        match self {
            CaseMode::Upper => single(c.to_uppercase()),
            CaseMode::Lower => single(c.to_lowercase()),
            CaseMode::Preserve => Some(c),
        }
    }
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Ordered set of unique characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
    case_mode: CaseMode,
    ring: Ring,
}

impl Alphabet {
    /// Builds an alphabet from its characters in order.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidParameter` if the alphabet has fewer than two
    /// characters or contains duplicates.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::alphabet::{Alphabet, CaseMode};
    /// let alphabet = Alphabet::try_from_str("ABC").unwrap();
    /// assert_eq!(alphabet.len(), 3);
    /// assert_eq!(alphabet.case_mode(), CaseMode::Upper);
    /// assert!(Alphabet::try_from_str("ABA").is_err());
    /// ```
    pub fn try_from_str(symbols: &str) -> Result<Self, HillCryptoError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() < 2 {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Alphabet needs at least 2 characters, got {}",
                symbols.len()
            )));
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if let Some(first) = index.insert(c, i) {
                return Err(HillCryptoError::InvalidParameter(format!(
                    "Alphabet contains {:?} twice (positions {} and {})",
                    c, first, i
                )));
            }
        }

        let ring = Ring::try_with(symbols.len() as u64)?;
        let case_mode = CaseMode::derive(&symbols);

        Ok(Self {
            symbols,
            index,
            case_mode,
            ring,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`: construction rejects alphabets shorter than two characters.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The ring Z/mZ with `m = len()`.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Index of `c` after case folding.
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.case_mode
            .fold(c)
            .and_then(|folded| self.index.get(&folded).copied())
    }

    /// Character at `index`, if in range.
    pub fn symbol_at(&self, index: i64) -> Option<char> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.symbols.get(i).copied())
    }

    /// Encodes text, silently dropping characters the alphabet cannot represent.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::alphabet::Alphabet;
    /// let alphabet = Alphabet::try_from_str("ABC").unwrap();
    /// assert_eq!(alphabet.text_to_numbers("a-b c!"), vec![0, 1, 2]);
    /// ```
    pub fn text_to_numbers(&self, text: &str) -> Vector {
        text.chars()
            .filter_map(|c| self.index_of(c))
            .map(|i| i as i64)
            .collect()
    }

    /// Encodes text, failing on the first character the alphabet cannot represent.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::UnknownCharacter` with the offending character.
    pub fn text_to_numbers_strict(&self, text: &str) -> Result<Vector, HillCryptoError> {
        text.chars()
            .map(|c| {
                self.index_of(c)
                    .map(|i| i as i64)
                    .ok_or(HillCryptoError::UnknownCharacter(c))
            })
            .collect()
    }

    /// Decodes indices, silently skipping those outside `[0, m)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::alphabet::Alphabet;
    /// let alphabet = Alphabet::try_from_str("ABC").unwrap();
    /// assert_eq!(alphabet.numbers_to_text(&[2, 2, 7, -1, 0]), "CCA");
    /// ```
    pub fn numbers_to_text(&self, numbers: &[i64]) -> String {
        numbers.iter().filter_map(|&n| self.symbol_at(n)).collect()
    }

    /// Characters of `text` that would be dropped by [`Alphabet::text_to_numbers`].
    pub fn missing_characters(&self, text: &str) -> BTreeSet<char> {
        text.chars().filter(|&c| self.index_of(c).is_none()).collect()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

impl TryFrom<String> for Alphabet {
    type Error = HillCryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Alphabet::try_from_str(&value)
    }
}

impl From<Alphabet> for String {
    fn from(value: Alphabet) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_mode_derivation() {
        assert_eq!(CaseMode::derive(&['A', 'B']), CaseMode::Upper);
        assert_eq!(CaseMode::derive(&['a', 'b', ' ']), CaseMode::Lower);
        assert_eq!(CaseMode::derive(&['A', 'a']), CaseMode::Preserve);
        assert_eq!(CaseMode::derive(&['A', 'b']), CaseMode::Preserve);
        assert_eq!(CaseMode::derive(&['1', '+', '/']), CaseMode::Preserve);
        assert_eq!(CaseMode::derive(&['Ї', 'Ґ', 'Є']), CaseMode::Upper);
    }

    #[test]
    fn test_upper_alphabet_folds_input() -> Result<(), HillCryptoError> {
        let alphabet = Alphabet::try_from_str("АБВГ")?;
        assert_eq!(alphabet.text_to_numbers("абв Г"), vec![0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_lower_alphabet_folds_input() -> Result<(), HillCryptoError> {
        let alphabet = Alphabet::try_from_str("abc")?;
        assert_eq!(alphabet.case_mode(), CaseMode::Lower);
        assert_eq!(alphabet.text_to_numbers("CAB"), vec![2, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_mixed_alphabet_preserves_case() -> Result<(), HillCryptoError> {
        let alphabet = Alphabet::try_from_str("ABab")?;
        assert_eq!(alphabet.text_to_numbers("aAbB"), vec![2, 0, 3, 1]);
        Ok(())
    }

    #[test]
    fn test_unknown_characters_are_dropped() -> Result<(), HillCryptoError> {
        let alphabet = Alphabet::try_from_str("ABC")?;
        let numbers = alphabet.text_to_numbers("A, B; D!");
        assert_eq!(numbers, vec![0, 1]);
        assert_eq!(
            alphabet.missing_characters("A, B; D!"),
            [',', ' ', ';', 'D', '!'].into_iter().collect()
        );
        Ok(())
    }

    #[test]
    fn test_strict_encoding() -> Result<(), HillCryptoError> {
        let alphabet = Alphabet::try_from_str("ABC")?;
        assert_eq!(alphabet.text_to_numbers_strict("cab")?, vec![2, 0, 1]);
        assert!(matches!(
            alphabet.text_to_numbers_strict("AB?"),
            Err(HillCryptoError::UnknownCharacter('?'))
        ));
        Ok(())
    }

    #[test]
    fn test_multi_char_folding_is_dropped() -> Result<(), HillCryptoError> {
        // 'ß' uppercases to "SS"
        let alphabet = Alphabet::try_from_str("SAB")?;
        assert_eq!(alphabet.text_to_numbers("ßa"), vec![1]);
        Ok(())
    }

    #[test]
    fn test_numbers_to_text_skips_out_of_range() -> Result<(), HillCryptoError> {
        let alphabet = Alphabet::try_from_str("XYZ")?;
        assert_eq!(alphabet.numbers_to_text(&[0, 3, 1, -2, 2]), "XYZ");
        Ok(())
    }

    #[test]
    fn test_invalid_alphabets() {
        assert!(Alphabet::try_from_str("").is_err());
        assert!(Alphabet::try_from_str("A").is_err());
        assert!(matches!(
            Alphabet::try_from_str("ABCA"),
            Err(HillCryptoError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_serde_as_string() -> Result<(), HillCryptoError> {
        let alphabet = Alphabet::try_from_str("АБВ")?;
        let json = serde_json::to_string(&alphabet)?;
        assert_eq!(json, "\"АБВ\"");
        let back: Alphabet = serde_json::from_str(&json)?;
        assert_eq!(back, alphabet);
        assert!(serde_json::from_str::<Alphabet>("\"AA\"").is_err());
        Ok(())
    }
}
