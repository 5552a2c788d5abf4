//! Conversions between base units and display units.
//!
//! One display unit is 10^8 base units. All arithmetic goes through
//! [`Decimal`] so conversions are exact; never use `f64` for amounts.
//!
//! `to_base_units(to_display_units(x)) == x` holds for every `u64`. The other
//! direction floors anything finer than one base unit.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{Result, StackPayError};

/// Decimal places of a display unit.
pub const DECIMALS: u32 = 8;

/// Base units per display unit.
pub const SCALE: u64 = 100_000_000;

/// Convert base units to display units.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use stackpay_lib::amount::to_display_units;
///
/// assert_eq!(to_display_units(50_000_000), Decimal::new(5, 1));
/// ```
pub fn to_display_units(base: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(base), DECIMALS)
}

/// Convert display units to base units, flooring sub-unit remainders.
///
/// Fails with [`StackPayError::InvalidAmount`] on negative input or when the
/// result does not fit in a `u64`.
pub fn to_base_units(display: Decimal) -> Result<u64> {
    if display.is_sign_negative() && !display.is_zero() {
        return Err(StackPayError::InvalidAmount(format!(
            "{display} is negative"
        )));
    }

    display
        .checked_mul(Decimal::from(SCALE))
        .map(|scaled| scaled.floor())
        .and_then(|base| base.to_u64())
        .ok_or_else(|| StackPayError::InvalidAmount(format!("{display} is out of range")))
}

/// Parse user-entered display units such as `"1.5"`.
///
/// Fraction digits past [`DECIMALS`] are cut off before parsing, so the
/// result never rounds up across a base-unit boundary.
pub fn parse_display_amount(text: &str) -> Result<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StackPayError::InvalidAmount("amount is empty".to_string()));
    }

    let value = Decimal::from_str(truncate_fraction(text))
        .map_err(|e| StackPayError::InvalidAmount(format!("{text:?} is not a number: {e}")))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(StackPayError::InvalidAmount(format!("{text} is negative")));
    }
    Ok(value)
}

/// Digits of `text` up to and including the last base-unit place.
fn truncate_fraction(text: &str) -> &str {
    let places = DECIMALS as usize;
    match text.split_once('.') {
        Some((whole, fraction))
            if fraction.len() > places && fraction.bytes().all(|b| b.is_ascii_digit()) =>
        {
            &text[..whole.len() + 1 + places]
        }
        _ => text,
    }
}

/// Returns true if `text` carries non-zero digits finer than one base unit.
pub fn has_sub_unit_digits(text: &str) -> bool {
    text.trim()
        .split_once('.')
        .map(|(_, fraction)| fraction.bytes().skip(DECIMALS as usize).any(|b| b != b'0'))
        .unwrap_or(false)
}

/// Render base units as a display-unit string without trailing zeros.
pub fn format_display_units(base: u64) -> String {
    to_display_units(base).normalize().to_string()
}
