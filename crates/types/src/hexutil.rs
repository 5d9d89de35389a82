//! Field-level syntax checks and hex conversions used at the API boundary.
//!
//! Numeric fields are parsed as hex (prefix optional), matching how node
//! responses and wallet tooling exchange quantities. Byte fields accept
//! odd-length hex, which is left-padded with a zero nibble.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::TxError;

/// Raw input for a numeric field: a hex string or an integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Hex(String),
    Int(BigUint),
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Hex(s.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(s: String) -> Self {
        FieldInput::Hex(s)
    }
}

impl From<&String> for FieldInput {
    fn from(s: &String) -> Self {
        FieldInput::Hex(s.clone())
    }
}

impl From<u64> for FieldInput {
    fn from(v: u64) -> Self {
        FieldInput::Int(BigUint::from(v))
    }
}

impl From<u128> for FieldInput {
    fn from(v: u128) -> Self {
        FieldInput::Int(BigUint::from(v))
    }
}

impl From<BigUint> for FieldInput {
    fn from(v: BigUint) -> Self {
        FieldInput::Int(v)
    }
}

impl From<&BigUint> for FieldInput {
    fn from(v: &BigUint) -> Self {
        FieldInput::Int(v.clone())
    }
}

pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// `0x`-prefixed lowercase hex of `bytes` (`"0x"` for empty input).
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode hex with an optional prefix. Odd lengths get a leading zero nibble.
pub fn decode_hex(s: &str) -> Option<Vec<u8>> {
    let body = strip_hex_prefix(s);
    if body.len() % 2 == 1 {
        hex::decode(format!("0{body}")).ok()
    } else {
        hex::decode(body).ok()
    }
}

/// `0x`-prefixed hex of a quantity, without leading zeros (`0x0` for zero).
pub fn quantity_to_hex(value: &BigUint) -> String {
    format!("0x{value:x}")
}

/// Minimal big-endian bytes; zero is the empty string.
pub fn to_minimal_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

fn parse_hex_quantity(body: &str) -> Option<BigUint> {
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    BigUint::parse_bytes(body.as_bytes(), 16)
}

/// Parse a required numeric field.
pub fn parse_quantity(field: &str, input: &FieldInput) -> Result<BigUint, TxError> {
    match input {
        FieldInput::Int(v) => Ok(v.clone()),
        FieldInput::Hex(s) => {
            parse_hex_quantity(strip_hex_prefix(s)).ok_or_else(|| TxError::invalid(field))
        }
    }
}

/// Parse an auto-fillable numeric field. `""` and `"0x"` mean unset.
pub fn parse_optional_quantity(
    field: &str,
    input: &FieldInput,
) -> Result<Option<BigUint>, TxError> {
    match input {
        FieldInput::Hex(s) if strip_hex_prefix(s).is_empty() => Ok(None),
        other => parse_quantity(field, other).map(Some),
    }
}

/// Parse a byte-string field such as `input`.
pub fn parse_data(field: &str, input: &str) -> Result<Vec<u8>, TxError> {
    decode_hex(input).ok_or_else(|| TxError::invalid(field))
}
