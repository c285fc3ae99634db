//! Shared render functions
//!
//! Renderers are pure and total: values with no meaning render as an
//! "unrecognized" string instead of failing, and blob renderers accept windows
//! of any length.

/// Placeholder text for enumerated values with no defined meaning
pub fn unrecognized(value: u8) -> String {
    format!("Unrecognized value 0x{:x}", value)
}

pub fn supported(value: u8) -> String {
    let text = if value != 0 { "supported" } else { "not supported" };
    text.to_string()
}

/// Space separated hex dump, the default blob rendering
pub fn hex_bytes(window: &[u8]) -> String {
    window
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quoted string, or an explicit error for bytes that are not UTF-8
pub fn quoted_string(window: &[u8]) -> String {
    match std::str::from_utf8(window) {
        Ok(s) => format!("\"{}\"", s.trim_end_matches('\0').escape_debug()),
        Err(e) => format!("<undecodable string: {}>", e),
    }
}

/// IEEE OUI as `xx-xx-xx`
pub fn ieee_oui(window: &[u8]) -> String {
    window
        .iter()
        .take(3)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join("-")
}

/// Number of KSV bits in a 40-bit HDCP key selection vector
pub const KSV_BITS: u32 = 40;

/// HDCP KSV bit weight; a valid KSV has exactly 20 ones and 20 zeros
pub fn ksv_bit_weight(window: &[u8]) -> String {
    let ones: u32 = window.iter().map(|b| b.count_ones()).sum();
    format!("{} 1s, {} 0s", ones, KSV_BITS.saturating_sub(ones))
}
