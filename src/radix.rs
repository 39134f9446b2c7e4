// Decoding of share values written in an arbitrary radix.

use num::bigint::{BigInt, BigUint, Sign};

use crate::error::DecodeError;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

/// Decode `value`, written in `base`, into an exact integer.
///
/// Digits are `0-9` followed by `a-z` (case-insensitive), so bases up to 36
/// are supported.  A single leading `-` or `+` is allowed.
pub fn decode(value: &str, base: u32) -> Result<BigInt, DecodeError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(DecodeError::UnsupportedBase(i64::from(base)));
    }

    let (sign, digits, offset) = match value.strip_prefix('-') {
        Some(rest) => (Sign::Minus, rest, 1),
        None => match value.strip_prefix('+') {
            Some(rest) => (Sign::Plus, rest, 1),
            None => (Sign::Plus, value, 0),
        },
    };
    if digits.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut buf = Vec::with_capacity(digits.len());
    for (position, digit) in digits.chars().enumerate() {
        match digit.to_digit(base) {
            Some(d) => buf.push(d as u8),
            None => {
                return Err(DecodeError::InvalidDigit {
                    digit,
                    position: position + offset,
                    base,
                })
            }
        }
    }

    // Every entry of buf is below base; from_radix_be only refuses bad radixes.
    let magnitude = BigUint::from_radix_be(&buf, base)
        .ok_or(DecodeError::UnsupportedBase(i64::from(base)))?;
    Ok(BigInt::from_biguint(sign, magnitude))
}
