use hill_crypto::alphabet::Alphabet;
use hill_crypto::cipher::{HillKey, KeyMatrix, decrypt_modified, decrypt_text, encrypt_modified, encrypt_text};
use hill_crypto::errors::HillCryptoError;
use hill_crypto::inverse::{InverseStrategy, MatrixShape};
use hill_crypto::keygen::{SignatureParams, random_invertible};
use hill_crypto::payload::{
    DEFAULT_PADDING_SYMBOL, decode_payload, encode_payload, pad_for_block, remove_padding,
};
use hill_crypto::preset::alphabets::template;
use hill_crypto::ring::Ring;
use hill_crypto::substitution::Substitution;

use rand::prelude::{SeedableRng, StdRng};

#[test]
fn happy_flow() -> Result<(), HillCryptoError> {
    let alphabet = Alphabet::try_from_str("ABC")?;
    let matrix = KeyMatrix::try_from_rows(vec![vec![1, 2], vec![3, 5]])?;
    let key = HillKey::standard(alphabet, matrix);

    let cipher = key.encrypt("AB")?;
    assert_eq!(cipher, "CC");

    let decoded = key.decrypt(&cipher)?;
    assert_eq!(decoded, "AB");

    Ok(())
}

#[test]
fn singular_key_cannot_decrypt() -> Result<(), HillCryptoError> {
    let alphabet = Alphabet::try_from_str("ABCD")?;
    let matrix = KeyMatrix::try_from_rows(vec![vec![2, 2], vec![2, 2]])?;

    for text in ["AB", "ABCD", "DCBADA"] {
        assert!(matches!(
            decrypt_text(text, &alphabet, &matrix, None, 0),
            Err(HillCryptoError::SingularMatrix(_))
        ));
    }

    // encryption itself never checks invertibility
    let mut rng = StdRng::seed_from_u64(1);
    assert!(encrypt_text("AB", &alphabet, &matrix, None, 0, &mut rng).is_ok());
    Ok(())
}

#[test]
fn noise_length_must_be_below_matrix_size() -> Result<(), HillCryptoError> {
    let alphabet = Alphabet::try_from_str("ABCDE")?;
    let matrix = KeyMatrix::try_from_rows(vec![vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]])?;
    let substitution = Substitution::shift(5, 1)?;
    let mut rng = StdRng::seed_from_u64(2);

    assert!(matches!(
        encrypt_text("ABCDE", &alphabet, &matrix, Some(&substitution), 3, &mut rng),
        Err(HillCryptoError::InvalidParameter(_))
    ));
    assert!(matches!(
        decrypt_text("ABC", &alphabet, &matrix, Some(&substitution), 3),
        Err(HillCryptoError::InvalidParameter(_))
    ));
    assert!(encrypt_text("ABCDE", &alphabet, &matrix, Some(&substitution), 2, &mut rng).is_ok());
    Ok(())
}

#[test]
fn modified_flow_with_random_key() -> Result<(), HillCryptoError> {
    let mut rng = StdRng::seed_from_u64(12345);
    let alphabet = template("english")?;
    let matrix = random_invertible(5, alphabet.ring(), &mut rng)?;
    let substitution = Substitution::random(alphabet.len(), &mut rng)?;
    let key = HillKey::modified(alphabet, matrix, substitution, 2)?;

    let original = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
    let cipher = key.encrypt_with(original, &mut rng)?;
    // 35 symbols in useful parts of 3 -> 12 blocks of 5
    assert_eq!(cipher.chars().count(), 60);

    let decoded = key.decrypt(&cipher)?;
    assert_eq!(&decoded[..original.len()], original);
    assert_eq!(&decoded[original.len()..], "A");

    Ok(())
}

#[test]
fn same_block_encrypts_differently_by_position() -> Result<(), HillCryptoError> {
    let ring = Ring::try_with(26)?;
    let matrix = KeyMatrix::try_from_rows(vec![vec![3, 3], vec![2, 5]])?;
    let substitution = Substitution::shift(26, 7)?;
    let mut rng = StdRng::seed_from_u64(3);

    let plain = [4, 4, 4, 4, 4, 4];
    let cipher = encrypt_modified(&plain, &matrix, &ring, &substitution, 0, &mut rng)?;
    assert_ne!(cipher[0..2], cipher[2..4]);
    assert_ne!(cipher[2..4], cipher[4..6]);

    let decoded = decrypt_modified(&cipher, &matrix, &ring, Some(&substitution), 0)?;
    assert_eq!(decoded, plain);
    Ok(())
}

#[test]
fn large_keys_use_the_expected_strategies() -> Result<(), HillCryptoError> {
    let mut rng = StdRng::seed_from_u64(77);
    let ring = Ring::try_with(67)?;

    let general = random_invertible(8, &ring, &mut rng)?;
    let (_, report) = general.inverse_with_report(&ring)?;
    assert_eq!(report.strategy, InverseStrategy::GaussJordan);

    let params = SignatureParams::try_new(3, 67, 10, 0)?;
    let mut circulant = None;
    for secret in 6..20 {
        let candidate = params.matrix_for_secret(secret)?;
        if candidate.is_invertible_mod(&ring) {
            circulant = Some(candidate);
            break;
        }
    }
    let Some(circulant) = circulant else {
        panic!("no invertible circulant key found");
    };
    let (_, report) = circulant.inverse_with_report(&ring)?;
    assert_eq!(report.shape, MatrixShape::Circulant);
    assert_eq!(report.strategy, InverseStrategy::Circulant);
    assert!(report.determinant.is_some());

    Ok(())
}

#[test]
fn signature_derived_key_round_trip() -> Result<(), HillCryptoError> {
    let mut rng = StdRng::seed_from_u64(31);
    let alphabet = template("base64")?;
    let params = SignatureParams::try_new(2, alphabet.len() as u64, 17, 1)?;

    // sender and receiver derive the same matrix
    let (signed, matrix) = loop {
        let signed = params.sign(&mut rng)?;
        if signed.secret > 11 {
            continue;
        }
        let matrix = params.matrix_for_secret(signed.secret)?;
        if matrix.is_invertible_mod(alphabet.ring()) {
            break (signed, matrix);
        }
    };
    assert_eq!(params.matrix_from_signature(signed.signature)?, matrix);

    let substitution = Substitution::shift(alphabet.len(), -1)?;
    let key = HillKey::modified(alphabet, matrix, substitution, 1)?;
    let text = "Base64Text+With/Symbols=";
    let decoded = key.decrypt(&key.encrypt_with(text, &mut rng)?)?;
    assert!(decoded.starts_with(text));

    Ok(())
}

#[test]
fn file_payload_flow() -> Result<(), HillCryptoError> {
    let mut rng = StdRng::seed_from_u64(99);
    let alphabet = template("base64")?;
    let matrix = random_invertible(4, alphabet.ring(), &mut rng)?;
    let key = HillKey::modified(
        alphabet.clone(),
        matrix,
        Substitution::random(alphabet.len(), &mut rng)?,
        1,
    )?;

    let bytes: Vec<u8> = (0..=255u8).rev().chain(0..=32).collect();
    let framed = encode_payload(&bytes, Some("bin"))?;
    let (padded, _) = pad_for_block(&framed, key.matrix.size(), DEFAULT_PADDING_SYMBOL)?;
    assert!(alphabet.missing_characters(&padded).is_empty());

    let cipher = key.encrypt_with(&padded, &mut rng)?;
    let decoded = key.decrypt(&cipher)?;
    let (clean, removed) = remove_padding(&decoded, DEFAULT_PADDING_SYMBOL);
    assert!(removed >= padded.chars().count() - framed.chars().count());

    let payload = decode_payload(&clean)?;
    assert_eq!(payload.extension.as_deref(), Some("bin"));
    assert_eq!(payload.data, bytes);

    Ok(())
}

#[test]
fn key_bundle_survives_json() -> Result<(), HillCryptoError> {
    let mut rng = StdRng::seed_from_u64(5);
    let alphabet = template("ukrainian")?;
    let key = HillKey::modified(
        alphabet.clone(),
        random_invertible(3, alphabet.ring(), &mut rng)?,
        Substitution::reverse(alphabet.len())?,
        1,
    )?;

    let restored = HillKey::from_json(&key.to_json()?)?;
    let cipher = key.encrypt_with("Слава", &mut rng)?;
    assert!(restored.decrypt(&cipher)?.starts_with("СЛАВА"));
    Ok(())
}
