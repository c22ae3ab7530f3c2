/*
[INPUT]:  Hex quantities from RPC and base-unit integers
[OUTPUT]: U256 amounts and human-readable decimal strings
[POS]:    Chain layer - unit parsing and formatting
[UPDATE]: When supporting new quantity encodings or display rules
*/

use std::str::FromStr;

use alloy_primitives::U256;
use serde_json::Value;

use crate::error::{AdapterError, Result};

/// Decimals of an EVM native token (wei per ether)
pub const ETHER_DECIMALS: u8 = 18;

/// Parse a JSON-RPC hex quantity such as `"0xde0b6b3a7640000"`
pub fn parse_quantity(value: &Value) -> Result<U256> {
    let raw = value.as_str().ok_or_else(|| {
        AdapterError::InvalidResponse(format!("expected hex quantity, got {value}"))
    })?;

    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .filter(|digits| !digits.is_empty())
        .ok_or_else(|| AdapterError::InvalidResponse(format!("invalid hex quantity '{raw}'")))?;

    U256::from_str_radix(digits, 16)
        .map_err(|e| AdapterError::InvalidResponse(format!("invalid hex quantity '{raw}': {e}")))
}

/// Parse a decimal base-unit integer such as `"1000000000000000000"`
pub fn parse_base_units(raw: &str) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AdapterError::InvalidResponse(format!("invalid amount '{raw}'")));
    }
    U256::from_str(trimmed)
        .map_err(|e| AdapterError::InvalidResponse(format!("invalid amount '{raw}': {e}")))
}

/// Shift `value` right by `decimals` places
///
/// Trailing fractional zeros are dropped but one fractional digit is always
/// kept, so whole amounts render as `"1.0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);

    let padded = if digits.len() <= decimals {
        format!("{digits:0>width$}", width = decimals + 1)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };

    format!("{whole}.{fraction}")
}

pub fn format_ether(value: U256) -> String {
    format_units(value, ETHER_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("1000000000000000000", "1.0")]
    #[case("0", "0.0")]
    #[case("1", "0.000000000000000001")]
    #[case("1500000000000000000", "1.5")]
    #[case("123456789012345678901", "123.456789012345678901")]
    #[case("100000000000000000", "0.1")]
    fn test_format_ether(#[case] wei: &str, #[case] expected: &str) {
        let value = parse_base_units(wei).unwrap();
        assert_eq!(format_ether(value), expected);
    }

    #[rstest]
    #[case(1_500_000, 6, "1.5")]
    #[case(42, 0, "42.0")]
    #[case(5, 2, "0.05")]
    fn test_format_units(#[case] value: u64, #[case] decimals: u8, #[case] expected: &str) {
        assert_eq!(format_units(U256::from(value), decimals), expected);
    }

    #[test]
    fn test_format_ether_max_value() {
        let formatted = format_ether(U256::MAX);
        assert!(formatted.starts_with("115792089237316195423570985008687907853269984665640564039457."));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(
            parse_quantity(&json!("0xde0b6b3a7640000")).unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(parse_quantity(&json!("0x0")).unwrap(), U256::ZERO);
        assert!(parse_quantity(&json!("0x")).is_err());
        assert!(parse_quantity(&json!("123")).is_err());
        assert!(parse_quantity(&json!(123)).is_err());
    }

    #[test]
    fn test_parse_base_units_rejects_garbage() {
        assert!(parse_base_units("1.5").is_err());
        assert!(parse_base_units("").is_err());
    }
}
