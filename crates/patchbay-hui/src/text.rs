//! Display character sets.
//!
//! Text displays use printable ASCII; the surface renders codes below 0x20
//! as vendor glyphs, which decode here as `'?'`. The time display uses a
//! separate digit code: 0x00..=0x0F are hex digits, 0x10..=0x1F the same
//! digits with a trailing decimal point, 0x20 is blank.

use patchbay_core::RangeError;

const UNKNOWN: char = '?';

/// Pads or truncates `text` to exactly `width` display bytes.
pub(crate) fn encode_text(text: &str, width: usize) -> impl Iterator<Item = u8> + '_ {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            _ => UNKNOWN as u8,
        })
        .chain(core::iter::repeat(b' '))
        .take(width)
}

pub(crate) fn decode_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7E => b as char,
            _ => UNKNOWN,
        })
        .collect()
}

/// Time display digits left to right, e.g. `"01.00.00.00"` or `" 1 2"`.
///
/// Each digit is `0-9`, `A-F` (uppercase) or a space; a `.` marks a decimal
/// point after the preceding digit. At least one digit is required.
pub(crate) fn encode_time_digits(digits: &str) -> Result<Vec<u8>, RangeError> {
    if digits.is_empty() {
        return Err(RangeError::Underflow);
    }
    let mut codes: Vec<u8> = Vec::with_capacity(digits.len());
    for c in digits.chars() {
        match c {
            '.' => match codes.last_mut() {
                Some(code) if *code < 0x10 => *code |= 0x10,
                _ => return Err(RangeError::Overflow),
            },
            ' ' => codes.push(0x20),
            '0'..='9' => codes.push(c as u8 - b'0'),
            'A'..='F' => codes.push(c as u8 - b'A' + 10),
            _ => return Err(RangeError::Overflow),
        }
    }
    Ok(codes)
}

pub(crate) fn decode_time_digits(codes: &[u8]) -> Option<String> {
    let mut digits = String::with_capacity(codes.len() * 2);
    for &code in codes {
        match code {
            0x00..=0x1F => {
                let digit = char::from_digit(u32::from(code & 0x0F), 16)?;
                digits.push(digit.to_ascii_uppercase());
                if code & 0x10 != 0 {
                    digits.push('.');
                }
            }
            0x20 => digits.push(' '),
            _ => return None,
        }
    }
    Some(digits)
}
