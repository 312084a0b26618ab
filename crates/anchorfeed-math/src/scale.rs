//! Decimal rescaling between heterogeneous price precisions.
//!
//! Feeds report at arbitrary decimal widths; internally every price lives at
//! a single canonical denominator. Rescaling is a multiplication or a
//! truncating division by a power of ten. Every power of ten is bounded by
//! [`MAX_DECIMAL_DIGITS`], so a feed claiming an implausible width is
//! rejected at configuration time rather than overflowing at read time.

use ethnum::U256;

use crate::{MathError, Result};

/// Largest decimal exponent any multiplier computation may use.
///
/// `10^38` still fits a `u128`; `10^39` does not.
pub const MAX_DECIMAL_DIGITS: u32 = 38;

/// Compute `10^exp` as a `u128`.
///
/// # Errors
///
/// - [`MathError::PrecisionOverflow`] if `exp` exceeds [`MAX_DECIMAL_DIGITS`]
pub fn pow10(exp: u32) -> Result<u128> {
    if exp > MAX_DECIMAL_DIGITS {
        return Err(MathError::PrecisionOverflow { decimals: exp });
    }
    Ok(10u128.pow(exp))
}

/// Rescale `value` from `from_decimals` to `to_decimals`.
///
/// Scaling up multiplies by `10^(to - from)`; scaling down divides by
/// `10^(from - to)`, truncating toward zero. Truncation means down-scaling
/// is lossy: `scale(scale(x, d1, d2), d2, d1) == x` holds when `d1 <= d2`
/// but not in general the other direction.
///
/// # Errors
///
/// - [`MathError::PrecisionOverflow`] if the decimal delta exceeds the safe bound
/// - [`MathError::Overflow`] if the up-scaled value does not fit a `u128`
pub fn scale(value: u128, from_decimals: u32, to_decimals: u32) -> Result<u128> {
    if from_decimals < to_decimals {
        let multiplier = pow10(to_decimals - from_decimals)?;
        value.checked_mul(multiplier).ok_or(MathError::Overflow)
    } else if from_decimals > to_decimals {
        let divisor = pow10(from_decimals - to_decimals)?;
        Ok(value / divisor)
    } else {
        Ok(value)
    }
}

/// Compute `a * b / denom` with a 256-bit intermediate, truncating.
///
/// # Errors
///
/// - [`MathError::DivisionByZero`] if `denom` is zero
/// - [`MathError::Overflow`] if the quotient does not fit a `u128`
pub fn mul_div(a: u128, b: u128, denom: u128) -> Result<u128> {
    if denom == 0 {
        return Err(MathError::DivisionByZero);
    }
    let wide = U256::from(a) * U256::from(b) / U256::from(denom);
    u128::try_from(wide).map_err(|_| MathError::Overflow)
}
