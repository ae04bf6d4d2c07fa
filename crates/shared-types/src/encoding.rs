//! # Encoding Helpers
//!
//! Hex and decimal-string codecs shared by the on-disk artifact format and
//! the JSON-RPC adapters. Amounts are always decimal strings so no consumer
//! ever coerces them through a binary float.

use crate::entities::{Hash, U256};
use crate::errors::ParseError;

/// Encode a hash as `0x`-prefixed lowercase hex.
pub fn encode_hash(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Decode a `0x`-prefixed (or bare) 32-byte hex string.
pub fn decode_hash(s: &str) -> Result<Hash, ParseError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
    bytes.as_slice().try_into().map_err(|_| ParseError::InvalidLength {
        expected: 32,
        got: bytes.len(),
    })
}

/// Parse a canonical base-10 amount.
///
/// Only ASCII digits are accepted, with no sign and no leading zeros
/// (except `"0"` itself), so each value has exactly one spelling.
pub fn parse_decimal(s: &str) -> Result<U256, ParseError> {
    if s.is_empty() {
        return Err(ParseError::InvalidDecimal("empty string".to_string()));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidDecimal(format!("{s}: not a base-10 integer")));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(ParseError::InvalidDecimal(format!("{s}: leading zero")));
    }
    U256::from_dec_str(s).map_err(|e| ParseError::InvalidDecimal(format!("{s}: {e:?}")))
}

/// Parse a `0x` quantity as returned by JSON-RPC (`"0x1b4"`).
pub fn parse_quantity(s: &str) -> Result<u64, ParseError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| ParseError::InvalidHex(format!("{s}: {e}")))
}

/// Serde codec for `Hash` fields as `0x` hex strings.
pub mod hex_hash {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a hash as hex.
    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_hash(hash))
    }

    /// Deserialize a hash from hex.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hash(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde codec for `U256` amounts as base-10 strings.
pub mod decimal_u256 {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize the amount in base 10.
    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    /// Deserialize a base-10 amount.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_decimal(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hash_rejects_short_input() {
        assert!(matches!(
            decode_hash("0xabcd"),
            Err(ParseError::InvalidLength { expected: 32, got: 2 })
        ));
    }

    #[test]
    fn test_decode_hash_rejects_non_hex() {
        assert!(matches!(decode_hash("0xzz"), Err(ParseError::InvalidHex(_))));
    }

    #[test]
    fn test_hash_encoding_is_lowercase() {
        let s = encode_hash(&[0xAB; 32]);
        assert_eq!(s.len(), 66);
        assert!(s.starts_with("0xabab"));
        assert_eq!(decode_hash(&s).unwrap(), [0xAB; 32]);
    }

    #[test]
    fn test_parse_decimal_beyond_u128() {
        let big = "340282366920938463463374607431768211457";
        let value = parse_decimal(big).unwrap();
        assert_eq!(value.to_string(), big);
    }

    #[test]
    fn test_parse_decimal_rejects_float() {
        assert!(parse_decimal("1.5").is_err());
    }

    #[test]
    fn test_parse_decimal_rejects_empty() {
        assert!(matches!(parse_decimal(""), Err(ParseError::InvalidDecimal(_))));
    }

    #[test]
    fn test_parse_decimal_rejects_non_canonical_forms() {
        assert!(matches!(parse_decimal("007"), Err(ParseError::InvalidDecimal(_))));
        assert!(matches!(parse_decimal("00"), Err(ParseError::InvalidDecimal(_))));
        assert!(parse_decimal("+7").is_err());
        assert!(parse_decimal(" 7").is_err());
        assert_eq!(parse_decimal("0").unwrap(), U256::zero());
        assert_eq!(parse_decimal("700").unwrap(), U256::from(700));
    }

    #[test]
    fn test_parse_decimal_rejects_overflow() {
        let too_big = format!("{}0", U256::MAX);
        assert!(parse_decimal(&too_big).is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x1b4").unwrap(), 436);
        assert!(parse_quantity("0xnope").is_err());
    }
}
