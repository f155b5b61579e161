//! Strict wire codec for beacon API values.
//!
//! The beacon API carries every integer as a decimal string and every
//! fixed-size binary value as `0x`-prefixed hex. Decoding is a two-stage
//! pipeline: serde first reads a response into a wire struct whose fields
//! are untyped [`RawField`]s, then [`WireRecord::from_wire`] runs the
//! helpers below over those fields in a fixed order. Type mismatches are
//! therefore reported by the field decoder, against the field that holds
//! them, and only once every earlier field has passed. A record is only
//! constructed once every field has parsed, so a failure never leaves a
//! half-populated value behind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CodecError;
use crate::types::FixedBytes;

/// One wire field as it arrived. Absent and `null` both read as `None`.
pub type RawField = Option<Value>;

/// A record with a canonical JSON wire form.
pub trait WireRecord: Sized {
    /// Loosely-typed mirror of the JSON object. Field declaration order is
    /// the output order.
    type Wire: Serialize + DeserializeOwned;

    /// Decode fields in their documented order, stopping at the first error.
    fn from_wire(wire: Self::Wire) -> Result<Self, CodecError>;

    fn to_wire(&self) -> Self::Wire;
}

/// Decode one record from a JSON document.
pub fn decode<T: WireRecord>(json: &str) -> Result<T, CodecError> {
    let wire: T::Wire =
        serde_json::from_str(json).map_err(|e| CodecError::InvalidJson(e.to_string()))?;
    T::from_wire(wire)
}

/// Decode one record from an already-parsed JSON value.
pub fn decode_value<T: WireRecord>(value: Value) -> Result<T, CodecError> {
    let wire: T::Wire =
        serde_json::from_value(value).map_err(|e| CodecError::InvalidJson(e.to_string()))?;
    T::from_wire(wire)
}

/// Render a record as compact JSON with its fixed field order.
pub fn encode<T: WireRecord>(record: &T) -> Result<String, CodecError> {
    serde_json::to_string(&record.to_wire()).map_err(|e| CodecError::InvalidJson(e.to_string()))
}

// ==============================================================================
// Field Helpers
// ==============================================================================

/// Split a raw field into its text, or hand back the non-string value.
fn as_text(raw: Option<&Value>) -> Result<Option<&str>, &Value> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(other),
    }
}

/// An optional string field. Empty strings read as absent.
pub fn optional_text<'a>(
    field: &'static str,
    raw: Option<&'a Value>,
) -> Result<Option<&'a str>, CodecError> {
    as_text(raw)
        .map(|text| text.filter(|s| !s.is_empty()))
        .map_err(|other| CodecError::UnexpectedType {
            field,
            found: other.to_string(),
        })
}

/// Presence check shared by every field decoder. Absent, `null` and empty
/// strings are all reported as missing.
pub fn require<'a>(field: &'static str, raw: Option<&'a Value>) -> Result<&'a str, CodecError> {
    optional_text(field, raw)?.ok_or(CodecError::MissingField { field })
}

/// Decode a required unsigned decimal string into `T`.
pub fn decode_int<T: From<u64>>(field: &'static str, raw: Option<&Value>) -> Result<T, CodecError> {
    match as_text(raw) {
        Ok(text) => {
            let text = text
                .filter(|s| !s.is_empty())
                .ok_or(CodecError::MissingField { field })?;
            parse_int(field, text)
        }
        Err(other) => Err(CodecError::InvalidInteger {
            field,
            raw: other.to_string(),
            cause: "is not a decimal string".to_owned(),
        }),
    }
}

/// Decode a required hex string into exactly `N` bytes.
pub fn decode_bytes<const N: usize>(
    field: &'static str,
    raw: Option<&Value>,
) -> Result<FixedBytes<N>, CodecError> {
    match as_text(raw) {
        Ok(text) => {
            let text = text
                .filter(|s| !s.is_empty())
                .ok_or(CodecError::MissingField { field })?;
            parse_bytes(field, text)
        }
        Err(other) => Err(CodecError::InvalidHex {
            field,
            cause: format!("expected a hex string, got `{other}`"),
        }),
    }
}

/// Parse a present decimal string.
pub fn parse_int<T: From<u64>>(field: &'static str, raw: &str) -> Result<T, CodecError> {
    // `u64::from_str` tolerates a leading `+`; the wire format does not.
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidInteger {
            field,
            raw: raw.to_owned(),
            cause: "is not an unsigned decimal integer".to_owned(),
        });
    }
    raw.parse::<u64>()
        .map(T::from)
        .map_err(|e| CodecError::InvalidInteger {
            field,
            raw: raw.to_owned(),
            cause: e.to_string(),
        })
}

/// Parse a present hex string, with or without its `0x` prefix.
pub fn parse_bytes<const N: usize>(
    field: &'static str,
    raw: &str,
) -> Result<FixedBytes<N>, CodecError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    let bytes = hex::decode(digits).map_err(|cause| CodecError::InvalidHex {
        field,
        cause: cause.to_string(),
    })?;
    let actual = bytes.len();
    let array: [u8; N] = bytes.try_into().map_err(|_| CodecError::InvalidLength {
        field,
        expected: N,
        actual,
    })?;
    Ok(FixedBytes(array))
}

pub fn encode_int<T: Into<u64>>(value: T) -> String {
    value.into().to_string()
}

pub fn encode_bytes<const N: usize>(value: &FixedBytes<N>) -> String {
    value.to_string()
}

/// Wire form of an integer field.
pub fn int_field<T: Into<u64>>(value: T) -> RawField {
    Some(Value::String(encode_int(value)))
}

/// Wire form of a byte-array field.
pub fn bytes_field<const N: usize>(value: &FixedBytes<N>) -> RawField {
    Some(Value::String(encode_bytes(value)))
}

/// Wire form of a string field.
pub fn text_field(value: &str) -> RawField {
    Some(Value::String(value.to_owned()))
}

/// Sum reward components, reporting overflow against `field`.
pub fn checked_sum(field: &'static str, parts: &[u64]) -> Result<u64, CodecError> {
    parts
        .iter()
        .try_fold(0u64, |acc, part| acc.checked_add(*part))
        .ok_or(CodecError::Overflow { field })
}
