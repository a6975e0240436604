use crate::alphabet::Alphabet;
use crate::errors::HillCryptoError;

use lazy_static::lazy_static;
use std::collections::BTreeMap;

pub const UKRAINIAN: &str = "АБВГҐДЕЄЖЗИІЇЙКЛМНОПРСТУФХЦЧШЩЬЮЯ";
pub const UKRAINIAN_LOWER: &str = "абвгґдеєжзиіїйклмнопрстуфхцчшщьюя";
pub const ENGLISH: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const ENGLISH_MIXED: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
/// Standard Base64 symbols plus `.` for padding and `:` for the extension marker.
pub const BASE64: &str = "./:=+0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

lazy_static! {
    /// Template name to alphabet characters.
    pub static ref ALPHABET_TEMPLATES: BTreeMap<&'static str, String> = {
        let mut map = BTreeMap::new();
        map.insert("ukrainian", UKRAINIAN.to_string());
        map.insert("ukrainian_reversed", UKRAINIAN.chars().rev().collect());
        map.insert("ukrainian_mixed", format!("{}{}", UKRAINIAN, UKRAINIAN_LOWER));
        map.insert("english", ENGLISH.to_string());
        map.insert("english_reversed", ENGLISH.chars().rev().collect());
        map.insert("english_mixed", ENGLISH_MIXED.to_string());
        map.insert("base64", BASE64.to_string());
        map
    };
}

/// Builds the named template alphabet.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidParameter` for an unknown name.
pub fn template(name: &str) -> Result<Alphabet, HillCryptoError> {
    let symbols = ALPHABET_TEMPLATES.get(name).ok_or_else(|| {
        HillCryptoError::InvalidParameter(format!(
            "Unknown alphabet template {:?}, expected one of {:?}",
            name,
            template_names()
        ))
    })?;
    Alphabet::try_from_str(symbols)
}

pub fn template_names() -> Vec<&'static str> {
    ALPHABET_TEMPLATES.keys().copied().collect()
}
