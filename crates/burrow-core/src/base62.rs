//! Fixed-width base62 encoding for generated short codes.

/// Digits in ascending value order.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Radix of the encoding.
pub const BASE: u64 = 62;

/// Length of every system-generated short code.
pub const CODE_LENGTH: usize = 7;

/// Number of distinct generated codes (62^7, roughly 3.5e12).
pub const CODE_SPACE: u64 = BASE.pow(CODE_LENGTH as u32);

/// Encodes `value` as exactly [`CODE_LENGTH`] base62 digits.
///
/// Values outside the code space are reduced modulo [`CODE_SPACE`], and
/// short values are left-padded with `'0'`.
pub fn encode_fixed(value: u64) -> [u8; CODE_LENGTH] {
    let mut digits = [ALPHABET[0]; CODE_LENGTH];
    let mut rest = value % CODE_SPACE;

    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
    }

    digits
}

/// Decodes a base62 string back into its numeric value.
///
/// Returns `None` for characters outside the alphabet or on overflow.
pub fn decode(code: &str) -> Option<u64> {
    code.bytes().try_fold(0_u64, |acc, byte| {
        let digit = digit_value(byte)?;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

/// Returns `true` if `byte` is a base62 digit.
pub fn is_digit(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

fn digit_value(byte: u8) -> Option<u64> {
    match byte {
        b'0'..=b'9' => Some(u64::from(byte - b'0')),
        b'a'..=b'z' => Some(u64::from(byte - b'a') + 10),
        b'A'..=b'Z' => Some(u64::from(byte - b'A') + 36),
        _ => None,
    }
}
