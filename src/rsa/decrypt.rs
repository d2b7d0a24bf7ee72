// RSA Decryption Implementation
// Raw textbook primitive: m = c^d mod n

use num_bigint::BigUint;

use super::bigint::{mod_pow, to_bytes};
use super::keygen::PrivateKey;
use crate::error::Result;

/// Decrypt a ciphertext integer with the private key
///
/// Pure function over the supplied key; the inverse of
/// [`super::encrypt::encrypt`] for every plaintext below the modulus.
pub fn decrypt(private_key: &PrivateKey, ciphertext: &BigUint) -> BigUint {
    mod_pow(ciphertext, &private_key.d, &private_key.n)
}

/// Decrypt to the recovered message's minimal big-endian byte form
pub fn decrypt_bytes(private_key: &PrivateKey, ciphertext: &BigUint) -> Vec<u8> {
    to_bytes(&decrypt(private_key, ciphertext))
}

/// Decrypt to text, failing if the recovered bytes are not valid UTF-8
pub fn decrypt_string(private_key: &PrivateKey, ciphertext: &BigUint) -> Result<String> {
    Ok(String::from_utf8(decrypt_bytes(private_key, ciphertext))?)
}
