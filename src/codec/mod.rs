// Key Serialization Codecs
// DER (two-integer ASN.1 SEQUENCE) and its PEM text envelope

pub mod der;
pub mod pem;

pub use der::{decode_sequence, encode_sequence, DerValue};
pub use pem::{read_key, write_key, PemDocument};

use std::fmt;

/// Which half of a key pair a serialized document carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLabel {
    Public,
    Private,
}

impl KeyLabel {
    /// The label text as it appears inside the PEM markers
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyLabel::Public => "PUBLIC",
            KeyLabel::Private => "PRIVATE",
        }
    }

    fn from_str(label: &str) -> Option<Self> {
        match label {
            "PUBLIC" => Some(KeyLabel::Public),
            "PRIVATE" => Some(KeyLabel::Private),
            _ => None,
        }
    }
}

impl fmt::Display for KeyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
