use crate::alphabet::Alphabet;
use crate::cipher::{KeyMatrix, decrypt_text, encrypt_text, validate_noise_length};
use crate::errors::HillCryptoError;
use crate::substitution::Substitution;

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// Everything both parties need to encrypt and decrypt: alphabet, key matrix and,
/// for the modified mode, a substitution plus the noise length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HillKey {
    pub alphabet: Alphabet,
    pub matrix: KeyMatrix,
    #[serde(default)]
    pub substitution: Option<Substitution>,
    #[serde(default)]
    pub noise_length: usize,
}

impl HillKey {
    /// Key for the standard Hill cipher.
    pub fn standard(alphabet: Alphabet, matrix: KeyMatrix) -> Self {
        Self {
            alphabet,
            matrix,
            substitution: None,
            noise_length: 0,
        }
    }

    /// Key for the modified cipher.
    ///
    /// # Errors
    ///
    /// See [`HillKey::validate`].
    pub fn modified(
        alphabet: Alphabet,
        matrix: KeyMatrix,
        substitution: Substitution,
        noise_length: usize,
    ) -> Result<Self, HillCryptoError> {
        let key = Self {
            alphabet,
            matrix,
            substitution: Some(substitution),
            noise_length,
        };
        key.validate()?;
        Ok(key)
    }

    /// Checks the noise length against the matrix size and the substitution size
    /// against the alphabet. Invertibility is left to decryption.
    pub fn validate(&self) -> Result<(), HillCryptoError> {
        validate_noise_length(self.noise_length, self.matrix.size())?;
        let alphabet_size = self.alphabet.len();
        if let Some(substitution) = self
            .substitution
            .as_ref()
            .filter(|s| s.len() != alphabet_size)
        {
            return Err(HillCryptoError::InvalidParameter(format!(
                "Substitution size ({}) does not match the alphabet size ({})",
                substitution.len(),
                alphabet_size
            )));
        }
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.substitution.is_some()
    }

    /// Encrypts with noise drawn from the thread-local CSPRNG.
    pub fn encrypt(&self, text: &str) -> Result<String, HillCryptoError> {
        self.encrypt_with(text, &mut rand::rng())
    }

    pub fn encrypt_with<R>(&self, text: &str, rng: &mut R) -> Result<String, HillCryptoError>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        encrypt_text(
            text,
            &self.alphabet,
            &self.matrix,
            self.substitution.as_ref(),
            self.noise_length,
            rng,
        )
    }

    pub fn decrypt(&self, text: &str) -> Result<String, HillCryptoError> {
        decrypt_text(
            text,
            &self.alphabet,
            &self.matrix,
            self.substitution.as_ref(),
            self.noise_length,
        )
    }

    pub fn to_json(&self) -> Result<String, HillCryptoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a key bundle.
    pub fn from_json(json: &str) -> Result<Self, HillCryptoError> {
        let key: HillKey = serde_json::from_str(json)?;
        key.validate()?;
        Ok(key)
    }
}
