// RSA Primality Testing and Prime Generation
// Fermat + Miller-Rabin composite rejection and random prime sampling

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};
use std::time::Instant;

use super::bigint::mod_pow;
use crate::error::{Error, Result};

/// Default number of random witnesses per primality test
/// Gives a false-positive probability of at most 4^-40 per NIST guidance
pub const DEFAULT_WITNESS_COUNT: u32 = 40;

/// Fermat primality test
///
/// Checks that Fermat's little theorem, witness^(n-1) = 1 (mod n), holds for
/// `witnesses` independent random witnesses in [2, n-2]. Any failure rejects
/// immediately. Passes Carmichael numbers, so candidates must additionally
/// clear [`miller_rabin_test`].
pub fn fermat_test<R>(rng: &mut R, number: &BigUint, witnesses: u32) -> bool
where
    R: Rng + CryptoRng + ?Sized,
{
    if number.is_zero() {
        return false;
    }
    if *number <= BigUint::from(3u8) {
        // 1 and 2 are prime by convention; 3 leaves no witness interval
        return true;
    }

    let two = BigUint::from(2u8);
    let n_minus_1 = number - BigUint::one();
    for _ in 0..witnesses {
        // gen_biguint_range is half-open, so this draws from [2, n-2]
        let witness = rng.gen_biguint_range(&two, &n_minus_1);
        if !mod_pow(&witness, &n_minus_1, number).is_one() {
            return false;
        }
    }
    true
}

/// Miller-Rabin primality test
///
/// Writes n-1 = 2^s * d with d odd, then for each random witness a in
/// [2, n-2] computes a^d mod n and squares it s times. Finding a nontrivial
/// square root of 1, or ending on anything other than 1, proves n composite.
pub fn miller_rabin_test<R>(rng: &mut R, number: &BigUint, witnesses: u32) -> bool
where
    R: Rng + CryptoRng + ?Sized,
{
    let two = BigUint::from(2u8);
    if *number < two {
        return false;
    }
    if *number == two || *number == BigUint::from(3u8) {
        return true;
    }
    if number.is_even() {
        return false;
    }

    // Factor out powers of 2 until d is odd, so that n-1 = 2^s * d
    let n_minus_1 = number - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    for _ in 0..witnesses {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = mod_pow(&a, &d, number);
        for _ in 0..s {
            let y = mod_pow(&x, &two, number);
            if y.is_one() && !x.is_one() && x != n_minus_1 {
                // Nontrivial square root of 1 found, number is composite
                return false;
            }
            x = y;
        }
        if !x.is_one() {
            return false;
        }
    }
    true
}

/// Accept a candidate as prime only if both tests pass at the default
/// witness count
pub fn is_probable_prime<R>(rng: &mut R, number: &BigUint) -> bool
where
    R: Rng + CryptoRng + ?Sized,
{
    fermat_test(rng, number, DEFAULT_WITNESS_COUNT)
        && miller_rabin_test(rng, number, DEFAULT_WITNESS_COUNT)
}

/// Draw a random odd integer of exactly `bit_length` bits
fn random_odd_candidate<R>(rng: &mut R, bit_length: u64) -> BigUint
where
    R: Rng + CryptoRng + ?Sized,
{
    // Sample with the top bit set so a product of two primes lands near the
    // requested modulus size
    let lower = BigUint::one() << (bit_length - 1);
    let upper = BigUint::one() << bit_length;
    let mut candidate = rng.gen_biguint_range(&lower, &upper);

    // All primes > 2 are odd
    if candidate.is_even() {
        candidate += 1u8;
    }
    candidate
}

/// Reject bit lengths the sampling loop cannot satisfy: 0 bits leaves
/// nothing to draw and the only 1-bit odd integer is 1, which never passes
fn check_prime_bit_length(bit_length: u64) -> Result<()> {
    if bit_length < 2 {
        return Err(Error::InvalidPrimeSize { bits: bit_length });
    }
    Ok(())
}

/// Generate a random prime of the specified bit length (at least 2 bits)
///
/// Resamples until a candidate passes both primality tests; the expected
/// number of iterations is proportional to `bit_length`, but there is no
/// upper bound. Use [`find_prime_before`] when the caller needs a deadline.
pub fn find_prime<R>(rng: &mut R, bit_length: u64) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    check_prime_bit_length(bit_length)?;
    let start = Instant::now();
    let mut tried = 0u64;
    loop {
        tried += 1;
        let candidate = random_odd_candidate(rng, bit_length);
        if is_probable_prime(rng, &candidate) {
            debug!(
                "found {}-bit prime after {} candidates in {:?}",
                bit_length,
                tried,
                start.elapsed()
            );
            return Ok(candidate);
        }
    }
}

/// Deadline-aware variant of [`find_prime`]
///
/// Checks the deadline before each candidate and fails with
/// [`Error::Timeout`] once it has passed, so a host can bound the otherwise
/// unbounded sampling loop.
pub fn find_prime_before<R>(rng: &mut R, bit_length: u64, deadline: Instant) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    check_prime_bit_length(bit_length)?;
    let start = Instant::now();
    let mut tried = 0u64;
    loop {
        if Instant::now() > deadline {
            debug!(
                "gave up on {}-bit prime after {} candidates",
                bit_length, tried
            );
            return Err(Error::Timeout {
                elapsed_ms: start.elapsed().as_millis(),
            });
        }
        tried += 1;
        let candidate = random_odd_candidate(rng, bit_length);
        if is_probable_prime(rng, &candidate) {
            return Ok(candidate);
        }
    }
}
