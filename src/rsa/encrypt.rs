// RSA Encryption Implementation
// Raw textbook primitive: c = m^e mod n, no padding scheme

use num_bigint::BigUint;

use super::bigint::{from_bytes, mod_pow};
use super::keygen::PublicKey;
use crate::error::{Error, Result};

/// Encrypt a plaintext integer with the public key
///
/// Textbook RSA: deterministic and malleable, NOT IND-CPA secure. The
/// plaintext must be numerically smaller than the modulus or the result
/// would be irrecoverably reduced mod n.
pub fn encrypt(public_key: &PublicKey, plaintext: &BigUint) -> Result<BigUint> {
    if plaintext >= &public_key.n {
        return Err(Error::PlaintextOutOfRange);
    }
    Ok(mod_pow(plaintext, &public_key.e, &public_key.n))
}

/// Encrypt a byte message, framed as a big-endian unsigned integer
pub fn encrypt_bytes(public_key: &PublicKey, plaintext: &[u8]) -> Result<BigUint> {
    encrypt(public_key, &from_bytes(plaintext))
}

/// Encrypt a text message (UTF-8 bytes, big-endian framing)
pub fn encrypt_str(public_key: &PublicKey, plaintext: &str) -> Result<BigUint> {
    encrypt_bytes(public_key, plaintext.as_bytes())
}
