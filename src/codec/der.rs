// DER Codec
// Minimal ASN.1 DER subset: a SEQUENCE of non-negative INTEGERs

use num_bigint::BigUint;

use crate::error::{Error, Result};

/// ASN.1 tag byte for INTEGER
pub const TAG_INTEGER: u8 = 0x02;
/// ASN.1 tag byte for SEQUENCE
pub const TAG_SEQUENCE: u8 = 0x30;

/// Nesting depth accepted during decode
/// Keys are a flat SEQUENCE of INTEGERs; deeper input is hostile and must
/// fail before the recursion can exhaust the stack
const MAX_DECODE_DEPTH: usize = 8;

/// The DER subset this codec understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerValue {
    Integer(BigUint),
    Sequence(Vec<DerValue>),
}

impl DerValue {
    /// Encode as a DER TLV byte string
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            DerValue::Integer(value) => {
                let content = integer_content(value);
                out.push(TAG_INTEGER);
                push_length(content.len(), out);
                out.extend_from_slice(&content);
            }
            DerValue::Sequence(items) => {
                let mut content = Vec::new();
                for item in items {
                    item.encode_into(&mut content);
                }
                out.push(TAG_SEQUENCE);
                push_length(content.len(), out);
                out.extend_from_slice(&content);
            }
        }
    }

    /// Decode a single DER value consuming the whole buffer
    pub fn decode(bytes: &[u8]) -> Result<DerValue> {
        let (value, rest) = decode_tlv(bytes, 0)?;
        if !rest.is_empty() {
            return Err(Error::MalformedDer("trailing bytes after value"));
        }
        Ok(value)
    }
}

/// Minimal big-endian content octets for a non-negative INTEGER
/// A leading zero keeps values with the top bit set from reading back as
/// negative two's-complement
fn integer_content(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    bytes
}

/// Append a length field: short form up to 127, long form above
fn push_length(len: usize, out: &mut Vec<u8>) {
    if len <= 0x7f {
        out.push(len as u8);
    } else {
        let be = len.to_be_bytes();
        let skip = be.iter().take_while(|b| **b == 0).count();
        let len_bytes = &be[skip..];
        out.push(0x80 | len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
}

fn decode_tlv(bytes: &[u8], depth: usize) -> Result<(DerValue, &[u8])> {
    let (&tag, rest) = bytes
        .split_first()
        .ok_or(Error::MalformedDer("empty input"))?;
    let (content, rest) = split_content(rest)?;
    let value = match tag {
        TAG_INTEGER => DerValue::Integer(decode_integer_content(content)?),
        TAG_SEQUENCE => {
            if depth >= MAX_DECODE_DEPTH {
                return Err(Error::MalformedDer("nesting too deep"));
            }
            let mut items = Vec::new();
            let mut remaining = content;
            while !remaining.is_empty() {
                let (item, after) = decode_tlv(remaining, depth + 1)?;
                items.push(item);
                remaining = after;
            }
            DerValue::Sequence(items)
        }
        _ => return Err(Error::MalformedDer("unexpected tag")),
    };
    Ok((value, rest))
}

/// Split off one length-prefixed content field, validating the length form
fn split_content(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let (&first, rest) = bytes
        .split_first()
        .ok_or(Error::MalformedDer("truncated length"))?;

    let (len, rest) = if first & 0x80 == 0 {
        (first as usize, rest)
    } else {
        let count = (first & 0x7f) as usize;
        if count == 0 {
            return Err(Error::MalformedDer("indefinite length not allowed"));
        }
        if count > std::mem::size_of::<usize>() {
            return Err(Error::MalformedDer("length field too large"));
        }
        if rest.len() < count {
            return Err(Error::MalformedDer("truncated length"));
        }
        let mut len = 0usize;
        for &b in &rest[..count] {
            len = (len << 8) | b as usize;
        }
        (len, &rest[count..])
    };

    if rest.len() < len {
        return Err(Error::MalformedDer("length exceeds remaining buffer"));
    }
    Ok(rest.split_at(len))
}

fn decode_integer_content(content: &[u8]) -> Result<BigUint> {
    match content.first() {
        None => Err(Error::MalformedDer("empty INTEGER content")),
        // Top bit set means negative in two's-complement; this codec only
        // carries non-negative values
        Some(b) if b & 0x80 != 0 => Err(Error::MalformedDer("negative INTEGER")),
        _ => Ok(BigUint::from_bytes_be(content)),
    }
}

/// Encode an ordered list of integers as a DER SEQUENCE of INTEGERs
pub fn encode_sequence(values: &[BigUint]) -> Vec<u8> {
    DerValue::Sequence(values.iter().cloned().map(DerValue::Integer).collect()).encode()
}

/// Decode a DER SEQUENCE of INTEGERs back to the integers it carries
pub fn decode_sequence(bytes: &[u8]) -> Result<Vec<BigUint>> {
    match DerValue::decode(bytes)? {
        DerValue::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                DerValue::Integer(value) => Ok(value),
                DerValue::Sequence(_) => Err(Error::MalformedDer("expected INTEGER element")),
            })
            .collect(),
        DerValue::Integer(_) => Err(Error::MalformedDer("expected SEQUENCE")),
    }
}
