//! Time-weighted anchor price computation.
//!
//! Pure function of a cumulative tick window and the asset configuration.
//! A reversed market negates the average tick before exponentiation, which
//! inverts the ratio exactly in tick space.

use anchorfeed_math::tick::{price_at_tick, time_weighted_average_tick};
use anchorfeed_math::scale::mul_div;
use anchorfeed_types::source::TickWindow;
use anchorfeed_types::QUOTE_SCALE;

use crate::Result;

/// Compute the canonical anchor price for one asset.
///
/// The average tick over `period_secs` is floored toward negative
/// infinity, converted to an 18-decimal price ratio, then rescaled by the
/// asset's base unit against the quote currency's fixed width.
pub fn anchor_price(
    window: &TickWindow,
    period_secs: u32,
    base_unit: u128,
    reversed: bool,
) -> Result<u128> {
    let mut tick =
        time_weighted_average_tick(window.cumulative_start, window.cumulative_end, period_secs)?;
    if reversed {
        tick = -tick;
    }
    let ratio = price_at_tick(tick)?;
    Ok(mul_div(ratio, base_unit, QUOTE_SCALE)?)
}
