// PEM Codec
// Text envelope: base64-encoded DER payload between BEGIN/END key markers

use num_bigint::BigUint;
use std::io::{Read, Write};

use super::der::{decode_sequence, encode_sequence};
use super::KeyLabel;
use crate::error::{Error, Result};

/// Base64 body line width mandated by the PEM format
pub const LINE_WIDTH: usize = 64;

const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const MARKER_SUFFIX: &str = " KEY-----";

/// A parsed or to-be-written PEM document
///
/// Constructed once and never mutated; encode/decode are pure
/// transformations of the (label, payload) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemDocument {
    pub label: KeyLabel,
    pub payload: Vec<u8>,
}

impl PemDocument {
    pub fn new(label: KeyLabel, payload: Vec<u8>) -> Self {
        Self { label, payload }
    }

    /// Render the document as PEM text
    pub fn encode(&self) -> String {
        let body = base64::encode(&self.payload);
        let mut out = format!("{}{}{}\n", BEGIN_PREFIX, self.label, MARKER_SUFFIX);

        // Base64 output is ASCII, so byte-indexed splitting is safe
        let mut rest = body.as_str();
        while !rest.is_empty() {
            let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
            out.push_str(line);
            out.push('\n');
            rest = tail;
        }

        out.push_str(END_PREFIX);
        out.push_str(self.label.as_str());
        out.push_str(MARKER_SUFFIX);
        out.push('\n');
        out
    }

    /// Parse PEM text: strip the markers, join the body lines and
    /// base64-decode the payload
    pub fn decode(text: &str) -> Result<PemDocument> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let header = lines
            .next()
            .ok_or_else(|| Error::MalformedPem("empty document".to_string()))?;
        let label = parse_marker(header, BEGIN_PREFIX)?;

        let mut body = String::new();
        let mut end_label = None;
        for line in lines {
            if line.starts_with(END_PREFIX) {
                end_label = Some(parse_marker(line, END_PREFIX)?);
                break;
            }
            if line.starts_with("-----") {
                return Err(Error::MalformedPem(format!(
                    "unexpected marker line: {line}"
                )));
            }
            body.push_str(line);
        }

        let end_label =
            end_label.ok_or_else(|| Error::MalformedPem("missing END marker".to_string()))?;
        if end_label != label {
            return Err(Error::MalformedPem(format!(
                "marker labels do not match: BEGIN {label}, END {end_label}"
            )));
        }

        let payload = base64::decode(&body)
            .map_err(|e| Error::MalformedPem(format!("invalid base64: {e}")))?;
        Ok(PemDocument { label, payload })
    }
}

fn parse_marker(line: &str, prefix: &str) -> Result<KeyLabel> {
    let inner = line
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(MARKER_SUFFIX))
        .ok_or_else(|| Error::MalformedPem(format!("malformed marker line: {line}")))?;
    KeyLabel::from_str(inner)
        .ok_or_else(|| Error::MalformedPem(format!("unknown key label: {inner}")))
}

/// Serialize key integers as a PEM-wrapped DER SEQUENCE and write the text
/// to the sink
pub fn write_key<W>(values: &[BigUint], label: KeyLabel, sink: &mut W) -> Result<()>
where
    W: Write + ?Sized,
{
    let doc = PemDocument::new(label, encode_sequence(values));
    sink.write_all(doc.encode().as_bytes())?;
    sink.flush()?;
    Ok(())
}

/// Read PEM text from the source and reconstruct the key integers it wraps
pub fn read_key<R>(source: &mut R) -> Result<(KeyLabel, Vec<BigUint>)>
where
    R: Read + ?Sized,
{
    let mut raw = Vec::new();
    source.read_to_end(&mut raw)?;
    let text = String::from_utf8(raw)
        .map_err(|_| Error::MalformedPem("document is not valid UTF-8".to_string()))?;

    let doc = PemDocument::decode(&text)?;
    let values = decode_sequence(&doc.payload)?;
    Ok((doc.label, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wire_format() {
        let doc = PemDocument::new(KeyLabel::Public, vec![0x42; 100]);
        let text = doc.encode();
        assert!(text.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(text.ends_with("\n-----END PUBLIC KEY-----\n"));

        // 100 payload bytes become 136 base64 chars: 64 + 64 + 8
        let body: Vec<&str> = text
            .lines()
            .filter(|l| !l.starts_with("-----"))
            .collect();
        assert_eq!(
            body.iter().map(|l| l.len()).collect::<Vec<_>>(),
            vec![64, 64, 8]
        );
    }

    #[test]
    fn test_document_round_trip() {
        for label in [KeyLabel::Public, KeyLabel::Private] {
            let doc = PemDocument::new(label, b"payload bytes".to_vec());
            assert_eq!(PemDocument::decode(&doc.encode()).unwrap(), doc);
        }
    }

    #[test]
    fn test_write_read_key_in_memory() {
        let values = vec![BigUint::from(0xdead_beefu32), BigUint::from(65537u32)];

        // Two ends of the same in-memory buffer act as sink and source
        let mut buf = Vec::new();
        write_key(&values, KeyLabel::Private, &mut buf).unwrap();
        let (label, got) = read_key(&mut buf.as_slice()).unwrap();

        assert_eq!(label, KeyLabel::Private);
        assert_eq!(got, values);
    }

    #[test]
    fn test_decode_rejects_missing_begin_marker() {
        let res = PemDocument::decode("QUJD\n-----END PUBLIC KEY-----\n");
        assert!(matches!(res, Err(Error::MalformedPem(_))));
    }

    #[test]
    fn test_decode_rejects_missing_end_marker() {
        let res = PemDocument::decode("-----BEGIN PUBLIC KEY-----\nQUJD\n");
        assert!(matches!(res, Err(Error::MalformedPem(_))));
    }

    #[test]
    fn test_decode_rejects_mismatched_labels() {
        let text = "-----BEGIN PUBLIC KEY-----\nQUJD\n-----END PRIVATE KEY-----\n";
        let res = PemDocument::decode(text);
        assert!(matches!(res, Err(Error::MalformedPem(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_label() {
        let text = "-----BEGIN SESSION KEY-----\nQUJD\n-----END SESSION KEY-----\n";
        let res = PemDocument::decode(text);
        assert!(matches!(res, Err(Error::MalformedPem(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let text = "-----BEGIN PUBLIC KEY-----\n@@@not base64@@@\n-----END PUBLIC KEY-----\n";
        let res = PemDocument::decode(text);
        assert!(matches!(res, Err(Error::MalformedPem(_))));
    }

    #[test]
    fn test_read_key_rejects_non_utf8() {
        let mut source: &[u8] = &[0xff, 0xfe, 0x00, 0x01];
        let res = read_key(&mut source);
        assert!(matches!(res, Err(Error::MalformedPem(_))));
    }
}
