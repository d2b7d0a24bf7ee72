// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, Rng};
use std::time::Instant;

use super::bigint::{gcd, lcm, mod_inverse};
use super::prime::{find_prime, find_prime_before};
use crate::codec::der::{decode_sequence, encode_sequence};
use crate::codec::pem::PemDocument;
use crate::codec::KeyLabel;
use crate::error::{Error, Result};

/// The conventional public exponent, 2^16 + 1
pub const PUBLIC_EXPONENT: u32 = 65537;

/// Small odd exponents to fall back to before resampling uniformly
const FALLBACK_EXPONENTS: [u32; 4] = [3, 5, 17, 257];

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// Modulus n = p * q
    pub n: BigUint,
    /// Public exponent e, coprime with lambda(n)
    pub e: BigUint,
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    /// Modulus (same as the public half)
    pub n: BigUint,
    /// Private exponent d = e^(-1) mod lambda(n)
    pub d: BigUint,
}

/// RSA Key Pair
///
/// Both halves share one modulus and are produced atomically by a single
/// generation run; never pair keys from two different runs.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl PublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt a message with this key, see [`crate::rsa::encrypt::encrypt_bytes`]
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<BigUint> {
        super::encrypt::encrypt_bytes(self, plaintext)
    }

    /// Serialize as a PEM-wrapped two-integer DER SEQUENCE (n, e)
    pub fn to_pem(&self) -> String {
        let der = encode_sequence(&[self.n.clone(), self.e.clone()]);
        PemDocument::new(KeyLabel::Public, der).encode()
    }

    /// Parse from PEM text; the document must carry the PUBLIC label
    pub fn from_pem(text: &str) -> Result<Self> {
        let doc = PemDocument::decode(text)?;
        if doc.label != KeyLabel::Public {
            return Err(Error::MissingKey(KeyLabel::Public));
        }
        let (n, e) = two_integers(decode_sequence(&doc.payload)?)?;
        Ok(Self { n, e })
    }
}

impl PrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt a ciphertext with this key, see [`crate::rsa::decrypt::decrypt_bytes`]
    pub fn decrypt_bytes(&self, ciphertext: &BigUint) -> Vec<u8> {
        super::decrypt::decrypt_bytes(self, ciphertext)
    }

    /// Serialize as a PEM-wrapped two-integer DER SEQUENCE (n, d)
    pub fn to_pem(&self) -> String {
        let der = encode_sequence(&[self.n.clone(), self.d.clone()]);
        PemDocument::new(KeyLabel::Private, der).encode()
    }

    /// Parse from PEM text; the document must carry the PRIVATE label
    pub fn from_pem(text: &str) -> Result<Self> {
        let doc = PemDocument::decode(text)?;
        if doc.label != KeyLabel::Private {
            return Err(Error::MissingKey(KeyLabel::Private));
        }
        let (n, d) = two_integers(decode_sequence(&doc.payload)?)?;
        Ok(Self { n, d })
    }
}

fn two_integers(values: Vec<BigUint>) -> Result<(BigUint, BigUint)> {
    let [first, second]: [BigUint; 2] = values
        .try_into()
        .map_err(|_| Error::MalformedDer("key SEQUENCE must contain exactly two INTEGERs"))?;
    Ok((first, second))
}

/// Generate an RSA key pair with the specified modulus bit length
///
/// The two prime factors are drawn independently at `bit_length / 2` bits
/// each, so `bit_length` must be even; it must also be at least 16 bits for
/// exponent selection to terminate.
pub fn generate_keypair<R>(rng: &mut R, bit_length: u64) -> Result<KeyPair>
where
    R: Rng + CryptoRng + ?Sized,
{
    check_bit_length(bit_length)?;
    let half_bits = bit_length / 2;

    // Step 1: Generate two distinct random primes p and q
    let p = find_prime(rng, half_bits)?;
    let q = loop {
        let q = find_prime(rng, half_bits)?;
        if q != p {
            break q;
        }
    };

    Ok(assemble(rng, p, q))
}

/// Deadline-aware variant of [`generate_keypair`]
///
/// Fails with [`Error::Timeout`] if either prime cannot be found before the
/// deadline passes.
pub fn generate_keypair_before<R>(rng: &mut R, bit_length: u64, deadline: Instant) -> Result<KeyPair>
where
    R: Rng + CryptoRng + ?Sized,
{
    check_bit_length(bit_length)?;
    let half_bits = bit_length / 2;

    let p = find_prime_before(rng, half_bits, deadline)?;
    let q = loop {
        let q = find_prime_before(rng, half_bits, deadline)?;
        if q != p {
            break q;
        }
    };

    Ok(assemble(rng, p, q))
}

fn check_bit_length(bit_length: u64) -> Result<()> {
    if bit_length < 16 || bit_length % 2 != 0 {
        return Err(Error::InvalidKeySize { bits: bit_length });
    }
    Ok(())
}

fn assemble<R>(rng: &mut R, p: BigUint, q: BigUint) -> KeyPair
where
    R: Rng + CryptoRng + ?Sized,
{
    let one = BigUint::one();

    // Step 2: Compute n = p * q
    let n = &p * &q;

    // Step 3: Carmichael function lambda(n) = lcm(p-1, q-1)
    let lambda = lcm(&(&p - &one), &(&q - &one));

    // Steps 4-5: Select e coprime with lambda, derive d = e^(-1) mod lambda
    let (e, d) = select_exponents(rng, &lambda);

    debug!("generated keypair: {}-bit modulus, e = {}", n.bits(), e);
    KeyPair {
        public: PublicKey { n: n.clone(), e },
        private: PrivateKey { n, d },
    }
}

/// Pick a public exponent coprime with lambda and its modular inverse
///
/// Tries 65537 first, then a small fixed odd candidate set, and only then
/// resamples uniformly from [3, lambda) until a coprime value turns up.
fn select_exponents<R>(rng: &mut R, lambda: &BigUint) -> (BigUint, BigUint)
where
    R: Rng + CryptoRng + ?Sized,
{
    let conventional = std::iter::once(PUBLIC_EXPONENT).chain(FALLBACK_EXPONENTS);
    for candidate in conventional {
        let e = BigUint::from(candidate);
        if e < *lambda && gcd(&e, lambda).is_one() {
            if let Some(d) = mod_inverse(&e, lambda) {
                return (e, d);
            }
        }
    }

    // Weak fallback: uniform resampling over the full range
    let three = BigUint::from(3u8);
    loop {
        let e = rng.gen_biguint_range(&three, lambda);
        if gcd(&e, lambda).is_one() {
            if let Some(d) = mod_inverse(&e, lambda) {
                return (e, d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::decrypt::{decrypt, decrypt_string};
    use crate::rsa::encrypt::{encrypt, encrypt_str};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xdead)
    }

    #[test]
    fn test_public_exponent_is_65537() {
        // Writing `(2 ^ 16) + 1` would XOR instead of exponentiate;
        // pin the conventional F4 value
        assert_eq!(PUBLIC_EXPONENT, 65537);
        assert_eq!(PUBLIC_EXPONENT, (1u32 << 16) + 1);
    }

    #[test]
    fn test_key_generation() {
        let keypair = generate_keypair(&mut rng(), 128).unwrap();
        assert_eq!(keypair.public.n, keypair.private.n);
        // Both factors have their top bit set, so n loses at most one bit
        assert!((127..=128).contains(&keypair.public.bit_length()));
        assert!(keypair.public.e > BigUint::one());
        assert!(keypair.private.d > BigUint::one());
    }

    #[test]
    fn test_key_generation_is_seed_deterministic() {
        let a = generate_keypair(&mut StdRng::seed_from_u64(7), 128).unwrap();
        let b = generate_keypair(&mut StdRng::seed_from_u64(7), 128).unwrap();
        assert_eq!(a.public, b.public);
        assert_eq!(a.private, b.private);
    }

    #[test]
    fn test_invalid_bit_lengths() {
        assert!(matches!(
            generate_keypair(&mut rng(), 15),
            Err(Error::InvalidKeySize { bits: 15 })
        ));
        assert!(matches!(
            generate_keypair(&mut rng(), 0),
            Err(Error::InvalidKeySize { bits: 0 })
        ));
    }

    #[test]
    fn test_key_encrypt_decrypt() {
        let keypair = generate_keypair(&mut rng(), 128).unwrap();
        for m in [0u64, 1, 42, 0xffff_ffff] {
            let m = BigUint::from(m);
            let c = encrypt(&keypair.public, &m).unwrap();
            assert_eq!(decrypt(&keypair.private, &c), m);
        }
    }

    #[test]
    fn test_key_encrypt_decrypt_text() {
        let keypair = generate_keypair(&mut rng(), 256).unwrap();
        let c = encrypt_str(&keypair.public, "Hello, RSA!").unwrap();
        assert_eq!(decrypt_string(&keypair.private, &c).unwrap(), "Hello, RSA!");
    }

    #[test]
    fn test_generate_before_expired_deadline() {
        let deadline = Instant::now();
        std::thread::sleep(Duration::from_millis(2));
        let res = generate_keypair_before(&mut rng(), 256, deadline);
        assert!(matches!(res, Err(Error::Timeout { .. })));
    }

    #[test]
    fn test_generate_before_generous_deadline() {
        let deadline = Instant::now() + Duration::from_secs(120);
        let keypair = generate_keypair_before(&mut rng(), 64, deadline).unwrap();
        assert_eq!(keypair.public.n, keypair.private.n);
    }

    #[test]
    fn test_pem_round_trip() {
        let keypair = generate_keypair(&mut rng(), 512).unwrap();

        let public = PublicKey::from_pem(&keypair.public.to_pem()).unwrap();
        assert_eq!(public, keypair.public);

        let private = PrivateKey::from_pem(&keypair.private.to_pem()).unwrap();
        assert_eq!(private, keypair.private);
    }

    #[test]
    fn test_from_pem_wrong_half() {
        let keypair = generate_keypair(&mut rng(), 128).unwrap();
        let res = PrivateKey::from_pem(&keypair.public.to_pem());
        assert!(matches!(res, Err(Error::MissingKey(KeyLabel::Private))));
        let res = PublicKey::from_pem(&keypair.private.to_pem());
        assert!(matches!(res, Err(Error::MissingKey(KeyLabel::Public))));
    }
}
