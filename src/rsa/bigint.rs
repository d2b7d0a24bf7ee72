// RSA Big Integer Operations
// Modular arithmetic kernel: pure functions over arbitrary-precision integers

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Convert a big integer to its minimal big-endian byte form
pub fn to_bytes(n: &BigUint) -> Vec<u8> {
    n.to_bytes_be()
}

/// Modular exponentiation: base^exp mod modulus
/// Uses the square-and-multiply algorithm, processing exponent bits
/// least-significant first
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        // Degenerate case: everything is congruent to 0 mod 1
        return BigUint::zero();
    }

    let mut result = BigUint::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Greatest common divisor via the iterative Euclidean algorithm
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple: a*b / gcd(a, b)
/// Returns 0 when either input is 0
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    if a.is_zero() || b.is_zero() {
        return BigUint::zero();
    }
    (a * b) / gcd(a, b)
}

/// Compute the modular multiplicative inverse: a^(-1) mod n
///
/// Runs the extended Euclidean algorithm to express gcd(a, n) as a linear
/// combination of a and n (Bezout's identity), then normalizes the
/// coefficient of a into [0, n). Returns None if gcd(a, n) != 1, in which
/// case no inverse exists.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    // The intermediate coefficients go negative, so this runs on signed ints
    let modulus = BigInt::from(n.clone());
    let mut old_r = BigInt::from(a.clone());
    let mut r = modulus.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = r;
        r = next_r;
        let next_s = &old_s - &quotient * &s;
        old_s = s;
        s = next_s;
    }

    if !old_r.is_one() {
        // a and n share a factor, no inverse exists
        return None;
    }

    let inverse = ((old_s % &modulus) + &modulus) % &modulus;
    Some(inverse.magnitude().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        assert_eq!(mod_pow(&big(3), &big(5), &big(7)), big(5));
        // reference value from naive repeated multiplication
        assert_eq!(mod_pow(&big(4), &big(13), &big(497)), big(445));
    }

    #[test]
    fn test_mod_pow_edge_cases() {
        // modulus 1 collapses everything to 0
        assert_eq!(mod_pow(&big(10), &big(10), &big(1)), big(0));
        // zero exponent gives 1
        assert_eq!(mod_pow(&big(42), &big(0), &big(97)), big(1));
        // base larger than modulus is reduced first
        assert_eq!(mod_pow(&big(100), &big(2), &big(7)), big(4 % 7));
    }

    #[test]
    fn test_mod_pow_matches_naive() {
        for base in 1u64..10 {
            for exp in 0u32..8 {
                let naive = big(base.pow(exp) % 1009);
                assert_eq!(mod_pow(&big(base), &big(exp as u64), &big(1009)), naive);
            }
        }
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&big(12), &big(18)), big(6));
        assert_eq!(gcd(&big(17), &big(31)), big(1));
        assert_eq!(gcd(&big(0), &big(5)), big(5));
        assert_eq!(gcd(&big(5), &big(0)), big(5));
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(&big(4), &big(6)), big(12));
        assert_eq!(lcm(&big(7), &big(11)), big(77));
        assert_eq!(lcm(&big(0), &big(9)), big(0));
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 4 = 12 = 1 mod 11
        assert_eq!(mod_inverse(&big(3), &big(11)), Some(big(4)));
        // 3 * 5 = 15 = 1 mod 7
        assert_eq!(mod_inverse(&big(3), &big(7)), Some(big(5)));
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        assert_eq!(mod_inverse(&big(4), &big(8)), None);
        assert_eq!(mod_inverse(&big(6), &big(9)), None);
    }

    #[test]
    fn test_mod_inverse_law() {
        // (a * a^-1) mod n = 1 for every coprime pair
        let n = big(1000003);
        for a in [2u64, 3, 65537, 999999] {
            let a = big(a);
            let inv = mod_inverse(&a, &n).unwrap();
            assert!(inv < n);
            assert_eq!((&a * &inv) % &n, big(1));
        }
    }

    #[test]
    fn test_byte_framing() {
        let data = b"Hello, RSA!";
        let n = from_bytes(data);
        assert_eq!(to_bytes(&n), data.to_vec());
    }
}
