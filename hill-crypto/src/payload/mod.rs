//! # Payload Module
//!
//! Frames arbitrary bytes as cipher-ready text: an optional `EXT:<ext>:` marker
//! followed by standard Base64, padded to whole blocks with a symbol the Base64
//! alphabet never produces.

use crate::errors::HillCryptoError;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Index 0 of the built-in Base64 template, so zero padding renders as this symbol too.
pub const DEFAULT_PADDING_SYMBOL: char = '.';

const MARKER_PREFIX: &str = "EXT:";

/// Decoded bytes plus the file extension carried in the marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub extension: Option<String>,
    pub data: Vec<u8>,
}

fn validate_extension(extension: &str) -> Result<(), HillCryptoError> {
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(HillCryptoError::Payload(format!(
            "Extension {:?} must be non-empty ASCII alphanumeric",
            extension
        )));
    }
    Ok(())
}

/// Encodes `data` as Base64, prefixed with `EXT:<extension>:` when an extension is given.
///
/// # Example
///
/// ```
/// # use hill_crypto::payload::encode_payload;
/// assert_eq!(encode_payload(b"hi", Some("txt")).unwrap(), "EXT:txt:aGk=");
/// assert_eq!(encode_payload(b"hi", None).unwrap(), "aGk=");
/// ```
pub fn encode_payload(data: &[u8], extension: Option<&str>) -> Result<String, HillCryptoError> {
    let body = STANDARD.encode(data);
    match extension {
        Some(extension) => {
            validate_extension(extension)?;
            Ok(format!("{}{}:{}", MARKER_PREFIX, extension, body))
        }
        None => Ok(body),
    }
}

/// Parses the optional marker and decodes the Base64 body.
///
/// # Errors
///
/// Returns `HillCryptoError::Payload` for a malformed marker and
/// `HillCryptoError::Base64` for an invalid body.
pub fn decode_payload(text: &str) -> Result<Payload, HillCryptoError> {
    let (extension, body) = match text.strip_prefix(MARKER_PREFIX) {
        Some(rest) => {
            let Some((extension, body)) = rest.split_once(':') else {
                return Err(HillCryptoError::Payload(
                    "Extension marker is not terminated by ':'".to_string(),
                ));
            };
            validate_extension(extension)?;
            (Some(extension.to_string()), body)
        }
        None => (None, text),
    };

    Ok(Payload {
        extension,
        data: STANDARD.decode(body)?,
    })
}

/// Appends `symbol` until the character count is a multiple of `block_size`.
///
/// Returns the padded text and how many symbols were added.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidParameter` if `block_size` is zero.
pub fn pad_for_block(
    text: &str,
    block_size: usize,
    symbol: char,
) -> Result<(String, usize), HillCryptoError> {
    if block_size == 0 {
        return Err(HillCryptoError::InvalidParameter(
            "Block size must be positive".to_string(),
        ));
    }
    let len = text.chars().count();
    let count = (block_size - len % block_size) % block_size;

    let mut padded = String::with_capacity(text.len() + count * symbol.len_utf8());
    padded.push_str(text);
    padded.extend(std::iter::repeat_n(symbol, count));
    Ok((padded, count))
}

/// Strips every trailing `symbol`; returns the remaining text and the number removed.
pub fn remove_padding(text: &str, symbol: char) -> (String, usize) {
    let trimmed = text.trim_end_matches(symbol);
    let removed = text[trimmed.len()..].chars().count();
    (trimmed.to_string(), removed)
}
