//! Hill block cipher over Z/mZ with exact-integer linear algebra.
//!
//! The standard mode multiplies fixed-size blocks by a key matrix modulo the
//! alphabet size. The modified mode adds random noise slots to every block and
//! scrambles each encrypted block with a substitution applied once per block
//! position.
//!
//! ```
//! use hill_crypto::alphabet::Alphabet;
//! use hill_crypto::cipher::{HillKey, KeyMatrix};
//!
//! let alphabet = Alphabet::try_from_str("ABC").unwrap();
//! let matrix = KeyMatrix::try_from_rows(vec![vec![1, 2], vec![3, 5]]).unwrap();
//! let key = HillKey::standard(alphabet, matrix);
//!
//! assert_eq!(key.encrypt("AB").unwrap(), "CC");
//! assert_eq!(key.decrypt("CC").unwrap(), "AB");
//! ```

pub mod alphabet;
pub mod cipher;
pub mod determinant;
pub mod errors;
pub mod inverse;
pub mod keygen;
pub mod payload;
pub mod preset;
pub mod ring;
pub mod search;
pub mod substitution;

pub use alphabet::{Alphabet, CaseMode};
pub use cipher::{HillKey, KeyMatrix};
pub use errors::HillCryptoError;
pub use substitution::Substitution;
