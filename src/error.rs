// Error types
// Every failure in this crate is a recoverable, synchronously reported condition

use crate::codec::KeyLabel;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during key generation, encryption/decryption or
/// key serialization
#[derive(Debug, Error)]
pub enum Error {
    /// Textbook RSA requires the plaintext integer to be strictly smaller
    /// than the modulus
    #[error("plaintext out of range: message must be numerically smaller than the modulus")]
    PlaintextOutOfRange,

    /// A PEM document was asked for a key half its label does not carry
    #[error("missing {0} key half")]
    MissingKey(KeyLabel),

    /// Tag mismatch, truncated length or length overrun while decoding DER
    #[error("malformed DER: {0}")]
    MalformedDer(&'static str),

    /// Missing/mismatched encapsulation markers or invalid base64
    #[error("malformed PEM: {0}")]
    MalformedPem(String),

    /// Decrypted bytes are not valid text although text output was requested
    #[error("decrypted bytes are not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Prime generation exceeded the caller-supplied deadline
    #[error("prime generation timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u128 },

    /// Requested modulus size cannot be split into two equal prime factors
    #[error("invalid key size: {bits} bits (must be even and at least 16)")]
    InvalidKeySize { bits: u64 },

    /// Requested prime size leaves no candidates to sample
    #[error("invalid prime size: {bits} bits (must be at least 2)")]
    InvalidPrimeSize { bits: u64 },

    /// Failure in the byte sink/source supplied for PEM reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
