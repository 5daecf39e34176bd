//! Hex, `\uXXXX` escapes and big-endian integer byte layouts.

use crate::error::{ConvertError, Result};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

// ============================================================================
// Hex
// ============================================================================

/// Lower-case hex encoding.
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_DIGITS[usize::from(b >> 4)] as char);
        out.push(HEX_DIGITS[usize::from(b & 0x0f)] as char);
    }
    out
}

/// Decode hex, case-insensitive. An odd-length input is read as if it had
/// a leading `0`.
pub fn hex_decode(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    let digits = hex
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| ConvertError::invalid(format!("Illegal hex character '{}'", c)))
        })
        .collect::<Result<Vec<u8>>>()?;

    let mut padded = Vec::with_capacity(digits.len() + 1);
    if digits.len() % 2 == 1 {
        padded.push(0);
    }
    padded.extend(digits);

    Ok(padded.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

/// Hex of the UTF-8 bytes of `text`.
pub fn str_to_hex(text: &str) -> String {
    hex_encode(text.as_bytes())
}

/// Decode hex and read the bytes as UTF-8.
pub fn hex_to_str(hex: &str) -> Result<String> {
    let bytes = hex_decode(hex)?;
    String::from_utf8(bytes)
        .map_err(|e| ConvertError::invalid(format!("Hex does not decode to UTF-8: {}", e)))
}

// ============================================================================
// Unicode escapes
// ============================================================================

/// Escape `text` as `\uXXXX` per UTF-16 code unit.
///
/// With `skip_ascii`, printable ASCII is copied through unescaped.
pub fn str_to_unicode(text: &str, skip_ascii: bool) -> String {
    let mut out = String::with_capacity(text.len() * 6);
    for c in text.chars() {
        if skip_ascii && (' '..='~').contains(&c) {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

/// Resolve `\uXXXX` escapes. Malformed escapes are kept literally and
/// surrogate pairs combine into one character.
pub fn unicode_to_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending: Vec<u16> = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(unit) = rest.strip_prefix("\\u").and_then(parse_escape) {
            pending.push(unit);
            rest = &rest[6..];
            continue;
        }

        if !pending.is_empty() {
            out.push_str(&String::from_utf16_lossy(&pending));
            pending.clear();
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !pending.is_empty() {
        out.push_str(&String::from_utf16_lossy(&pending));
    }
    out
}

fn parse_escape(after_prefix: &str) -> Option<u16> {
    let hex = after_prefix.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

// ============================================================================
// Integer byte layouts
// ============================================================================

fn exact<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        ConvertError::invalid(format!(
            "{} needs exactly {} bytes, got {}",
            what,
            N,
            bytes.len()
        ))
    })
}

/// Big-endian bytes of an `i32`.
pub fn int_to_bytes(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Read a big-endian `i32`.
pub fn bytes_to_int(bytes: &[u8]) -> Result<i32> {
    exact::<4>(bytes, "int").map(i32::from_be_bytes)
}

/// Big-endian bytes of an `i64`.
pub fn long_to_bytes(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Read a big-endian `i64`.
pub fn bytes_to_long(bytes: &[u8]) -> Result<i64> {
    exact::<8>(bytes, "long").map(i64::from_be_bytes)
}

/// Big-endian bytes of an `i16`.
pub fn short_to_bytes(value: i16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Read a big-endian `i16`.
pub fn bytes_to_short(bytes: &[u8]) -> Result<i16> {
    exact::<2>(bytes, "short").map(i16::from_be_bytes)
}

/// Keep the low eight bits of `value` as a signed byte.
pub fn int_to_byte(value: i32) -> i8 {
    value as i8
}

/// Read a signed byte as its unsigned value, 0..=255.
pub fn byte_to_unsigned_int(value: i8) -> i32 {
    i32::from(value as u8)
}
