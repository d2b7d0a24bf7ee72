//! # rsa_core
//!
//! A from-scratch, transparent implementation of textbook RSA: big-integer
//! modular arithmetic, Fermat + Miller-Rabin primality testing, keypair
//! generation, raw encrypt/decrypt primitives and a PKCS#1-style PEM/DER
//! key codec (two-integer SEQUENCE, RFC 8017 A.1.1 shape).
//!
//! ## Security warning
//!
//! This is textbook RSA: plaintext framing is raw big-endian integer
//! encoding with no padding scheme, which makes encryption deterministic
//! and malleable. It is explicitly NOT IND-CPA secure. There are no side-channel
//! countermeasures and no constant-time arithmetic. Do not use this crate
//! for real confidentiality; it is a reference implementation.
//!
//! ## Randomness
//!
//! No global RNG: every randomized operation takes an explicit
//! `&mut (impl Rng + CryptoRng)`. Pass `rand::thread_rng()` in production
//! and a seeded `StdRng` for deterministic tests.
//!
//! ```
//! use rsa_core::{generate_keypair, encrypt_str, decrypt_string};
//!
//! let keypair = generate_keypair(&mut rand::thread_rng(), 512).unwrap();
//! let ciphertext = encrypt_str(&keypair.public, "hello").unwrap();
//! assert_eq!(decrypt_string(&keypair.private, &ciphertext).unwrap(), "hello");
//! ```

pub mod codec;
pub mod error;
pub mod rsa;

pub use codec::{read_key, write_key, DerValue, KeyLabel, PemDocument};
pub use error::{Error, Result};
pub use rsa::{
    decrypt, decrypt_bytes, decrypt_string, encrypt, encrypt_bytes, encrypt_str,
    generate_keypair, generate_keypair_before, find_prime, is_probable_prime, KeyPair,
    PrivateKey, PublicKey, DEFAULT_WITNESS_COUNT, PUBLIC_EXPONENT,
};
