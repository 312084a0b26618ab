//! # anchorfeed-math
//!
//! Fixed-point arithmetic for the anchored price feed.
//!
//! All prices in the workspace are unsigned integers at a fixed decimal
//! denominator. This crate provides the pieces that move values between
//! denominators without silent overflow:
//!
//! ## Modules
//!
//! - [`scale`] — decimal rescaling and guarded power-of-ten multipliers
//! - [`tick`] — time-weighted average ticks and tick-to-price conversion

pub mod scale;
pub mod tick;

/// Error types for fixed-point arithmetic.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// A power-of-ten multiplier would exceed the safe decimal bound.
    #[error("precision overflow: 10^{decimals} exceeds the safe bound of 10^{max}", max = scale::MAX_DECIMAL_DIGITS)]
    PrecisionOverflow {
        /// The offending decimal exponent.
        decimals: u32,
    },

    /// An intermediate or final value does not fit the result type.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A tick is outside the representable range.
    #[error("tick {tick} outside [{min}, {max}]", min = tick::MIN_TICK, max = tick::MAX_TICK)]
    TickOutOfRange {
        /// The offending tick value.
        tick: i64,
    },

    /// The observation window is zero seconds wide.
    #[error("observation window must be non-zero")]
    EmptyWindow,
}

/// Convenience result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
