//! Fixed-point unsigned amounts and checked arithmetic
//!
//! Contribution value and token units are plain `u128` integers in the
//! smallest denomination. Prices carry an explicit scale of `10^18`, so a
//! price of `PRICE_SCALE` means one unit of value buys one token unit.
//! Division always truncates toward zero; the payer never gains from rounding.

use thiserror::Error;

/// Unsigned amount in the smallest denomination (value or token units).
pub type Amount = u128;

/// Unix timestamp in seconds, supplied by the caller at each operation.
pub type Timestamp = i64;

/// Fixed-point scale applied to prices (18 decimals).
pub const PRICE_SCALE: Amount = 1_000_000_000_000_000_000;

/// Arithmetic failures in fixed-point helpers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Compute `floor(a * b / c)` with overflow and zero-divisor checks.
///
/// Fails only when the result itself does not fit: an overflowing `a * b`
/// falls back to `(a / c) * b + (a % c) * b / c`, which is exact.
pub fn mul_div_floor(a: Amount, b: Amount, c: Amount) -> Result<Amount, NumericError> {
    if c == 0 {
        return Err(NumericError::DivisionByZero);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / c);
    }
    let whole = (a / c).checked_mul(b).ok_or(NumericError::Overflow)?;
    let part = (a % c).checked_mul(b).ok_or(NumericError::Overflow)? / c;
    whole.checked_add(part).ok_or(NumericError::Overflow)
}

/// Token units bought by `value` at `price_per_unit` (scaled by `PRICE_SCALE`).
pub fn units_for_value(value: Amount, price_per_unit: Amount) -> Result<Amount, NumericError> {
    mul_div_floor(value, PRICE_SCALE, price_per_unit)
}

/// Price in scaled form for a whole-number "value per unit" ratio.
pub fn price_from_ratio(value: Amount, units: Amount) -> Result<Amount, NumericError> {
    mul_div_floor(value, PRICE_SCALE, units)
}
