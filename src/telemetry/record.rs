//! Fixed-layout record decoding.
//!
//! A record is N signed 32-bit little-endian integers, four bytes per field,
//! with the field order fixed by configuration. Decoding is atomic: either
//! the payload length matches exactly and all fields parse, or the whole
//! record is rejected. There is no partial-field acceptance: fixed-width
//! integers cannot fail individually, so the length check is the whole
//! validity story (the wire format carries no checksum).

use bytes::Buf;
use thiserror::Error;

/// Bytes per decoded field.
pub const FIELD_BYTES: usize = 4;

/// One decoded telemetry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<i32>,
}

impl Record {
    /// Decoded field values in wire order.
    pub fn values(&self) -> &[i32] {
        &self.values
    }
}

/// A payload that could not be decoded.
///
/// Carries the raw payload for diagnostic surfacing. Callers substitute the
/// last successfully decoded record's values (degrade-to-stale-value policy)
/// rather than propagating zeros or aborting.
#[derive(Debug, Clone, Error)]
#[error("payload of {actual} bytes does not decode as {fields} i32 fields ({expected} bytes expected)")]
pub struct DecodeFailure {
    fields: usize,
    expected: usize,
    actual: usize,
    payload: Vec<u8>,
}

impl DecodeFailure {
    /// The raw payload that failed to decode.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Decode a frame payload into `field_count` little-endian i32 fields.
pub fn decode(payload: &[u8], field_count: usize) -> Result<Record, DecodeFailure> {
    let expected = field_count * FIELD_BYTES;
    if payload.len() != expected {
        return Err(DecodeFailure {
            fields: field_count,
            expected,
            actual: payload.len(),
            payload: payload.to_vec(),
        });
    }
    let mut buf = payload;
    let values = (0..field_count).map(|_| buf.get_i32_le()).collect();
    Ok(Record { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_exact_integers() {
        let values = [10i32, -20, i32::MAX, i32::MIN];
        let mut payload = Vec::new();
        for v in values {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let record = decode(&payload, 4).unwrap();
        assert_eq!(record.values(), &values);
    }

    #[test]
    fn decodes_known_triple_payload() {
        // 0x0A000000 0x14000000 0xF6FFFFFF -> (10, 20, -10)
        let payload = [
            0x0A, 0x00, 0x00, 0x00, //
            0x14, 0x00, 0x00, 0x00, //
            0xF6, 0xFF, 0xFF, 0xFF,
        ];
        let record = decode(&payload, 3).unwrap();
        assert_eq!(record.values(), &[10, 20, -10]);
    }

    #[test]
    fn rejects_short_payload() {
        let err = decode(&[0u8; 8], 3).unwrap_err();
        assert_eq!(err.payload().len(), 8);
        assert!(err.to_string().contains("12 bytes expected"));
    }

    #[test]
    fn rejects_long_payload() {
        assert!(decode(&[0u8; 16], 3).is_err());
    }

    #[test]
    fn rejects_empty_payload_unless_zero_fields() {
        assert!(decode(&[], 3).is_err());
        assert_eq!(decode(&[], 0).unwrap().values(), &[] as &[i32]);
    }
}
