// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod prime;

pub use decrypt::{decrypt, decrypt_bytes, decrypt_string};
pub use encrypt::{encrypt, encrypt_bytes, encrypt_str};
pub use keygen::{
    generate_keypair, generate_keypair_before, KeyPair, PrivateKey, PublicKey, PUBLIC_EXPONENT,
};
pub use prime::{
    fermat_test, find_prime, find_prime_before, is_probable_prime, miller_rabin_test,
    DEFAULT_WITNESS_COUNT,
};
