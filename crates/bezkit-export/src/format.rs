//! Locale-free number formatting.
//!
//! Every real number in the output has exactly four digits after a `.`.
//! Rounding works on the shortest decimal representation of the value and
//! goes half away from zero, so `-0.08925` becomes `-0.0893` even though
//! the nearest binary double is slightly below it in magnitude.

use tracing::warn;

/// Digits after the decimal point.
pub const PLACES: usize = 4;

const ZERO: &str = "0.0000";

/// Format a number with four decimal places.
///
/// Non-finite values have no representation in the output and are written
/// as zero.
pub fn four_places(value: f64) -> String {
    if !value.is_finite() {
        warn!(value = %value, "non-finite number written as zero");
        return ZERO.to_string();
    }

    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(PLACES))
        .collect();
    if frac_part
        .as_bytes()
        .get(PLACES)
        .is_some_and(|digit| *digit >= b'5')
    {
        round_up(&mut digits);
    }

    let negative = value.is_sign_negative() && digits.iter().any(|d| *d != b'0');
    let split = digits.len() - PLACES;

    let mut out = String::with_capacity(digits.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| char::from(*d)));
    out.push('.');
    out.extend(digits[split..].iter().map(|d| char::from(*d)));
    out
}

/// Add one unit in the last place of a decimal digit string.
fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
