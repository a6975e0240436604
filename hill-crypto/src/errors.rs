#[derive(thiserror::Error, Debug)]
pub enum HillCryptoError {
    /// Error when trying to find a modular inverse that doesn't exist (gcd(a, m) != 1).
    #[error("NoInverse: {0}")]
    NoInverse(String),
    /// The key matrix determinant shares a factor with the modulus.
    #[error("SingularMatrix: {0}")]
    SingularMatrix(String),
    /// Encoded text length is not a multiple of the matrix size.
    #[error("InvalidLength: {0}")]
    InvalidLength(String),
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),
    /// Error when creating a ring with an invalid modulus (m <= 1).
    #[error("InvalidModulus: {0}")]
    InvalidModulus(String),
    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),
    #[error("Character {0:?} is not part of the alphabet")]
    UnknownCharacter(char),

    #[error("Payload: {0}")]
    Payload(String),
    #[error("Base64 decoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("InternalError: {0}")]
    InternalError(String),

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}
