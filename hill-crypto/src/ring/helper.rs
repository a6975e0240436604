use crate::errors::HillCryptoError;

use lazy_static::lazy_static;
use num_integer::Integer;

use std::collections::HashMap;
use std::sync::Mutex;

/// Only inputs below this bound are memoized, which keeps the cache at alphabet scale.
pub const PRIME_CACHE_LIMIT: u64 = 1 << 16;

lazy_static! {
    /// Alphabet sizes repeat across calls, so primality answers are kept around.
    static ref PRIME_CACHE: Mutex<HashMap<u64, bool>> = Mutex::new(HashMap::new());
}

/// Computes the greatest common divisor of the absolute values of two numbers.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let temp = b;
        b = a % b;
        a = temp;
    }
    a
}

/// Returns `true` when `gcd(a, b) == 1`.
pub fn is_coprime(a: i64, b: i64) -> bool {
    gcd(a, b) == 1
}

/// Least common multiple, used for permutation orders.
pub fn lcm(a: u64, b: u64) -> u64 {
    a.lcm(&b)
}

/// Finds (g, x, y) such that ax + by = g = gcd(a, b).
pub fn extended_gcd(a: i64, b: i64) -> (i64, i64, i64) {
    if a == 0 {
        if b.is_negative() {
            return (-b, 0, -1);
        }

        return (b, 0, 1);
    }

    let (g, x1, y1) = extended_gcd(b % a, a);
    let x = y1 - (b / a) * x1;
    let y = x1;
    (g, x, y)
}

/// Computes `a^-1 mod m` with the extended Euclidean algorithm.
///
/// # Errors
///
/// Returns `HillCryptoError::InvalidModulus` if `m < 2` and
/// `HillCryptoError::NoInverse` if `gcd(a mod m, m) != 1` (this covers `a ≡ 0`).
///
/// # Example
///
/// ```
/// # use hill_crypto::ring::mod_inverse;
/// assert_eq!(mod_inverse(3, 26).unwrap(), 9);
/// assert_eq!(mod_inverse(-1, 3).unwrap(), 2);
/// assert!(mod_inverse(13, 26).is_err());
/// assert!(mod_inverse(0, 7).is_err());
/// ```
pub fn mod_inverse(a: i64, m: i64) -> Result<i64, HillCryptoError> {
    if m < 2 {
        return Err(HillCryptoError::InvalidModulus(format!(
            "Modulus must be greater than 1, got {}",
            m
        )));
    }

    let a_norm = a.rem_euclid(m);
    if a_norm == 0 {
        return Err(HillCryptoError::NoInverse(format!(
            "Cannot invert 0 in mod {}",
            m
        )));
    }

    let (g, x, _) = extended_gcd(a_norm, m);
    if g != 1 {
        return Err(HillCryptoError::NoInverse(format!(
            "Modular inverse does not exist for {} mod {} (gcd={})",
            a_norm, m, g
        )));
    }

    Ok(x.rem_euclid(m))
}

/// Deterministic trial division up to `√n`, skipping multiples of 2 and 3.
///
/// Results below [`PRIME_CACHE_LIMIT`] are memoized since callers keep asking about
/// the same alphabet sizes.
pub fn is_prime(n: u64) -> bool {
    if n >= PRIME_CACHE_LIMIT {
        return trial_division(n);
    }
    if let Ok(cache) = PRIME_CACHE.lock() {
        if let Some(&known) = cache.get(&n) {
            return known;
        }
    }

    let answer = trial_division(n);

    if let Ok(mut cache) = PRIME_CACHE.lock() {
        cache.insert(n, answer);
    }
    answer
}

fn trial_division(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i: u64 = 5;
    while i.saturating_mul(i) <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::PoisonError;

    #[test]
    fn test_simple_gcd() {
        assert_eq!(gcd(1, 6), 1);
        assert_eq!(gcd(4, 6), 2);
        assert_eq!(gcd(10, 0), 10);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(54, 24), 6);
        assert_eq!(gcd(-54, 24), 6);
        assert_eq!(gcd(54, -24), 6);
    }

    #[test]
    fn test_is_coprime() {
        assert!(is_coprime(2, 3));
        assert!(is_coprime(-1, 26));
        assert!(!is_coprime(13, 26));
        assert!(!is_coprime(0, 26));
    }

    #[test]
    fn test_prime_cache_stays_bounded() {
        assert!(is_prime(67));
        assert!(is_prime(1_000_003));
        assert!(!is_prime(1_000_001));

        let cache = PRIME_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(cache.get(&67), Some(&true));
        assert!(!cache.contains_key(&1_000_003));
        assert!(!cache.contains_key(&1_000_001));
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(1, 7), 7);
        assert_eq!(lcm(3, 5), 15);
    }

    #[test]
    fn test_extended_gcd_basic() {
        let (g, x, y) = extended_gcd(12, 8);
        assert_eq!(g, 4);
        assert_eq!(12 * x + 8 * y, g);

        let (g, x, y) = extended_gcd(17, 13);
        assert_eq!(g, 1);
        assert_eq!(17 * x + 13 * y, g);
    }

    #[test]
    fn test_extended_gcd_negative() {
        let (g, x, y) = extended_gcd(-15, 10);
        assert_eq!(g, 5);
        assert_eq!(-15 * x + 10 * y, g);
    }

    #[test]
    fn test_mod_inverse() -> Result<(), HillCryptoError> {
        assert_eq!(mod_inverse(3, 7)?, 5);
        assert_eq!(mod_inverse(2, 3)?, 2);
        assert_eq!(mod_inverse(9, 26)?, 3);
        assert_eq!(mod_inverse(35, 33)?, 17); // 35 ≡ 2, 2 * 17 = 34 ≡ 1
        Ok(())
    }

    #[test]
    fn test_mod_inverse_failures() {
        assert!(matches!(
            mod_inverse(0, 26),
            Err(HillCryptoError::NoInverse(_))
        ));
        assert!(matches!(
            mod_inverse(26, 26),
            Err(HillCryptoError::NoInverse(_))
        ));
        assert!(matches!(
            mod_inverse(4, 6),
            Err(HillCryptoError::NoInverse(_))
        ));
        assert!(matches!(
            mod_inverse(1, 1),
            Err(HillCryptoError::InvalidModulus(_))
        ));
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..50).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
        assert!(is_prime(67));
        assert!(!is_prime(33));
        assert!(!is_prime(66));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        // second lookup goes through the cache
        assert!(is_prime(67));
    }
}
