use hill_crypto::cipher::{
    KeyMatrix, decrypt_modified, decrypt_standard, encrypt_modified, encrypt_standard,
};
use hill_crypto::determinant::{DeterminantStrategy, determinant_with};
use hill_crypto::inverse::{InverseStrategy, invert_with};
use hill_crypto::keygen::{circulant_from_row, random_invertible};
use hill_crypto::ring::{Matrix, Ring};
use hill_crypto::substitution::Substitution;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use rand::prelude::{Rng, SeedableRng, StdRng};

const MODULI: [u64; 6] = [2, 26, 33, 37, 66, 67];

fn setup(seed: u64) -> (StdRng, Ring, KeyMatrix) {
    let mut rng = StdRng::seed_from_u64(seed);
    let ring = Ring::try_with(MODULI[(seed % MODULI.len() as u64) as usize]).unwrap();
    let size = rng.random_range(2..=7);
    let key = random_invertible(size, &ring, &mut rng).unwrap();
    (rng, ring, key)
}

#[quickcheck]
fn prop_standard_round_trip(plain: Vec<u16>, seed: u64) -> bool {
    let (_, ring, key) = setup(seed);
    let numbers: Vec<i64> = plain.iter().map(|&v| ring.normalize(v as i64)).collect();

    let Ok(cipher) = encrypt_standard(&numbers, &key, &ring) else {
        return false;
    };
    let Ok(decoded) = decrypt_standard(&cipher, &key, &ring) else {
        return false;
    };

    decoded.len() % key.size() == 0
        && decoded[..numbers.len()] == numbers[..]
        && decoded[numbers.len()..].iter().all(|&v| v == 0)
}

#[quickcheck]
fn prop_modified_round_trip(plain: Vec<u16>, seed: u64, noise: usize) -> bool {
    let (mut rng, ring, key) = setup(seed);
    let noise = noise % key.size();
    let numbers: Vec<i64> = plain.iter().map(|&v| ring.normalize(v as i64)).collect();
    let Ok(substitution) = Substitution::random(ring.modulus() as usize, &mut rng) else {
        return false;
    };

    let Ok(cipher) = encrypt_modified(&numbers, &key, &ring, &substitution, noise, &mut rng) else {
        return false;
    };
    let Ok(decoded) = decrypt_modified(&cipher, &key, &ring, Some(&substitution), noise) else {
        return false;
    };

    decoded[..numbers.len()] == numbers[..]
        && decoded.len() - numbers.len() < key.size() - noise
        && decoded[numbers.len()..].iter().all(|&v| v == 0)
}

#[quickcheck]
fn prop_determinant_strategies_agree(seed: u64) -> bool {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = rng.random_range(2..=8);
    let m: Matrix = (0..n)
        .map(|_| (0..n).map(|_| rng.random_range(-1000..1000)).collect())
        .collect();

    determinant_with(&m, DeterminantStrategy::Cofactor).ok()
        == determinant_with(&m, DeterminantStrategy::Bareiss).ok()
}

#[test]
fn determinant_strategies_agree_on_sparse_large_matrices() {
    let mut rng = StdRng::seed_from_u64(10);
    for n in [9, 10] {
        // half the entries are zero to keep cofactor expansion affordable
        let m: Matrix = (0..n)
            .map(|_| {
                (0..n)
                    .map(|_| {
                        if rng.random_bool(0.5) {
                            0
                        } else {
                            rng.random_range(-9..10)
                        }
                    })
                    .collect()
            })
            .collect();
        assert_eq!(
            determinant_with(&m, DeterminantStrategy::Cofactor).unwrap(),
            determinant_with(&m, DeterminantStrategy::Bareiss).unwrap()
        );
    }
}

#[quickcheck]
fn prop_circulant_inverse_strategies_agree(seed: u64, modulus_index: usize) -> TestResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let ring = Ring::try_with(MODULI[modulus_index % MODULI.len()]).unwrap();
    let n = rng.random_range(2..=7);
    let row: Vec<i64> = (0..n).map(|_| rng.random_range(0..256)).collect();
    let key = circulant_from_row(&row).unwrap();
    if !key.is_invertible_mod(&ring) {
        return TestResult::discard();
    }

    let inverses: Vec<Matrix> = [
        InverseStrategy::Circulant,
        InverseStrategy::GaussJordan,
        InverseStrategy::Adjugate,
    ]
    .into_iter()
    .filter_map(|strategy| invert_with(key.rows(), &ring, strategy).ok())
    .map(|(inverse, _)| inverse)
    .collect();

    TestResult::from_bool(
        inverses.len() == 3 && inverses[0] == inverses[1] && inverses[1] == inverses[2],
    )
}

#[quickcheck]
fn prop_substitution_invariants(seed: u64, size: u8, data: Vec<u8>) -> TestResult {
    // small sizes keep the order within a few hundred applications
    let size = size as usize % 20;
    if size == 0 {
        return TestResult::discard();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let p = Substitution::random(size, &mut rng).unwrap();
    let q = p.invert();
    let data: Vec<i64> = data.iter().map(|&v| (v as usize % size) as i64).collect();

    let order = p.order() as usize;
    TestResult::from_bool(
        q.invert() == p
            && q.apply(&p.apply(&data)) == data
            && p.apply_multiple(&data, order) == data
            && p.compose(&q).unwrap().is_identity(),
    )
}
