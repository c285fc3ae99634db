//! Manual register write arguments
//!
//! Turns an address / value pair typed on the command line (`0x3000 0x1`)
//! into bytes the decoder understands.

use crate::types::{DecoderError, Result};
use serde::Serialize;

/// Usage example attached to malformed input errors
pub const USAGE_HINT: &str = "dpcd-cli -p 0x3000 0x1";

/// A single register write parsed from command line arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualWrite {
    pub address: u32,
    pub values: Vec<u8>,
}

/// Parse the address and value arguments of a manual write
///
/// Both arguments are hex with an optional `0x` prefix. Values with an odd
/// number of digits are left padded, so `0x1` is the single byte `0x01` and
/// `0x123` is `[0x01, 0x23]`.
pub fn parse_manual_write(addr_hex: &str, params_hex: &str) -> Result<ManualWrite> {
    let address = parse_address(addr_hex)?;
    let values = parse_params(params_hex)?;
    log::debug!("Manual write: 0x{:05x} <- {:02x?}", address, values);
    Ok(ManualWrite { address, values })
}

/// Flatten a manual write into `[address_low_byte, param0, param1, ...]`
pub fn to_bytes(addr_hex: &str, params_hex: &str) -> Result<Vec<u8>> {
    let write = parse_manual_write(addr_hex, params_hex)?;
    let mut bytes = Vec::with_capacity(write.values.len() + 1);
    bytes.push((write.address & 0xff) as u8);
    bytes.extend(write.values);
    Ok(bytes)
}

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn parse_address(addr_hex: &str) -> Result<u32> {
    let digits = strip_hex_prefix(addr_hex);
    if digits.is_empty() {
        return Err(malformed(format!("empty address '{}'", addr_hex)));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|e| malformed(format!("invalid address '{}': {}", addr_hex, e)))
}

fn parse_params(params_hex: &str) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(params_hex);
    if digits.is_empty() {
        return Err(malformed(format!("empty value '{}'", params_hex)));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(malformed(format!("invalid hex digit '{}' in value '{}'", bad, params_hex)));
    }

    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };

    let nibbles: Vec<u8> = padded
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|d| d as u8)
        .collect();
    Ok(nibbles.chunks_exact(2).map(|pair| pair[0] << 4 | pair[1]).collect())
}

fn malformed(message: String) -> DecoderError {
    DecoderError::MalformedInput {
        message,
        hint: USAGE_HINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_prepends_address_byte() {
        assert_eq!(to_bytes("0x3000", "0x1").unwrap(), vec![0x00, 0x01]);
        assert_eq!(to_bytes("0x68029", "0x123").unwrap(), vec![0x29, 0x01, 0x23]);
        assert_eq!(to_bytes("102", "2184").unwrap(), vec![0x02, 0x21, 0x84]);
    }

    #[test]
    fn test_parse_manual_write_keeps_full_address() {
        let write = parse_manual_write("0x02200", "0x14").unwrap();
        assert_eq!(write.address, 0x2200);
        assert_eq!(write.values, vec![0x14]);

        let write = parse_manual_write("0X600", "0X0001").unwrap();
        assert_eq!(write.address, 0x600);
        assert_eq!(write.values, vec![0x00, 0x01]);
    }

    #[test]
    fn test_malformed_input_carries_hint() {
        for (addr, value) in [("0xzz", "0x1"), ("0x3000", "0xg1"), ("", "1"), ("0x3000", "0x")] {
            match parse_manual_write(addr, value) {
                Err(DecoderError::MalformedInput { hint, .. }) => assert_eq!(hint, USAGE_HINT),
                other => panic!("{} {}: expected MalformedInput, got {:?}", addr, value, other),
            }
        }
    }

    #[test]
    fn test_error_message_mentions_usage() {
        let err = to_bytes("0x3000", "nope").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nope"), "{}", message);
        assert!(message.contains(USAGE_HINT), "{}", message);
    }
}
