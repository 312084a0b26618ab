//! Tick arithmetic for time-weighted anchor markets.
//!
//! Anchor markets expose cumulative ticks, where a tick `t` encodes the
//! price ratio `1.0001^t`. The time-weighted average tick over a window is
//! the cumulative delta divided by the window length, floored toward
//! negative infinity. The floor must be preserved bit-exactly: historical
//! prices were produced with it and downstream bounds checks are sensitive
//! to the sub-tick bias.
//!
//! Tick-to-price conversion goes through the square root of the ratio in
//! Q64.64 fixed point, assembled by binary decomposition of the tick over
//! per-bit constants `sqrt(1.0001)^(2^i)`.

use ethnum::U256;

use crate::{MathError, Result};

/// Smallest representable tick.
pub const MIN_TICK: i32 = -443_636;

/// Largest representable tick.
pub const MAX_TICK: i32 = 443_636;

/// Fixed-point denominator for prices produced by [`price_at_tick`].
pub const PRICE_ONE: u128 = 1_000_000_000_000_000_000;

/// Compute the time-weighted average tick over an observation window.
///
/// `cumulative_start` and `cumulative_end` are cumulative tick readings
/// spaced `window_secs` apart. The average is floored toward negative
/// infinity, matching the cumulative source's integer semantics exactly.
///
/// # Errors
///
/// - [`MathError::EmptyWindow`] if `window_secs` is zero
/// - [`MathError::TickOutOfRange`] if the average falls outside the tick range
pub fn time_weighted_average_tick(
    cumulative_start: i64,
    cumulative_end: i64,
    window_secs: u32,
) -> Result<i32> {
    if window_secs == 0 {
        return Err(MathError::EmptyWindow);
    }
    let delta = i128::from(cumulative_end) - i128::from(cumulative_start);
    let avg = delta.div_euclid(i128::from(window_secs));
    if avg < i128::from(MIN_TICK) || avg > i128::from(MAX_TICK) {
        return Err(MathError::TickOutOfRange { tick: avg as i64 });
    }
    Ok(avg as i32)
}

/// Convert a tick to a price ratio at the [`PRICE_ONE`] denominator.
///
/// Returns `1.0001^tick * 1e18`, truncating. Ratios below `1e-18` truncate
/// to zero rather than erroring; callers treat a zero anchor as fatal.
///
/// # Errors
///
/// - [`MathError::TickOutOfRange`] if the tick is outside `[MIN_TICK, MAX_TICK]`
pub fn price_at_tick(tick: i32) -> Result<u128> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::TickOutOfRange {
            tick: i64::from(tick),
        });
    }
    let sqrt_ratio = sqrt_ratio_at_tick(tick);
    // Square the Q64.64 root and land on the 1e18 denominator.
    let wide = U256::from(sqrt_ratio) * U256::from(sqrt_ratio) * U256::from(PRICE_ONE) >> 128;
    u128::try_from(wide).map_err(|_| MathError::Overflow)
}

/// Square root of `1.0001^tick` in Q64.64 fixed point.
///
/// Binary decomposition over precomputed constants: the positive branch
/// works at Q96 precision and shifts down at the end, the negative branch
/// directly at Q64.64.
fn sqrt_ratio_at_tick(tick: i32) -> u128 {
    if tick >= 0 {
        sqrt_ratio_positive(tick)
    } else {
        sqrt_ratio_negative(tick)
    }
}

fn sqrt_ratio_positive(tick: i32) -> u128 {
    let mut ratio: u128 = if tick & 1 != 0 {
        79232123823359799118286999567
    } else {
        79228162514264337593543950336
    };

    if tick & 2 != 0 {
        ratio = mul_shift_96(ratio, 79236085330515764027303304731);
    }
    if tick & 4 != 0 {
        ratio = mul_shift_96(ratio, 79244008939048815603706035061);
    }
    if tick & 8 != 0 {
        ratio = mul_shift_96(ratio, 79259858533276714757314932305);
    }
    if tick & 16 != 0 {
        ratio = mul_shift_96(ratio, 79291567232598584799939703904);
    }
    if tick & 32 != 0 {
        ratio = mul_shift_96(ratio, 79355022692464371645785046466);
    }
    if tick & 64 != 0 {
        ratio = mul_shift_96(ratio, 79482085999252804386437311141);
    }
    if tick & 128 != 0 {
        ratio = mul_shift_96(ratio, 79736823300114093921829183326);
    }
    if tick & 256 != 0 {
        ratio = mul_shift_96(ratio, 80248749790819932309965073892);
    }
    if tick & 512 != 0 {
        ratio = mul_shift_96(ratio, 81282483887344747381513967011);
    }
    if tick & 1024 != 0 {
        ratio = mul_shift_96(ratio, 83390072131320151908154831281);
    }
    if tick & 2048 != 0 {
        ratio = mul_shift_96(ratio, 87770609709833776024991924138);
    }
    if tick & 4096 != 0 {
        ratio = mul_shift_96(ratio, 97234110755111693312479820773);
    }
    if tick & 8192 != 0 {
        ratio = mul_shift_96(ratio, 119332217159966728226237229890);
    }
    if tick & 16384 != 0 {
        ratio = mul_shift_96(ratio, 179736315981702064433883588727);
    }
    if tick & 32768 != 0 {
        ratio = mul_shift_96(ratio, 407748233172238350107850275304);
    }
    if tick & 65536 != 0 {
        ratio = mul_shift_96(ratio, 2098478828474011932436660412517);
    }
    if tick & 131072 != 0 {
        ratio = mul_shift_96(ratio, 55581415166113811149459800483533);
    }
    if tick & 262144 != 0 {
        ratio = mul_shift_96(ratio, 38992368544603139932233054999993551);
    }

    ratio >> 32
}

fn sqrt_ratio_negative(tick: i32) -> u128 {
    let abs_tick = tick.unsigned_abs();

    let mut ratio: u128 = if abs_tick & 1 != 0 {
        18445821805675392311
    } else {
        18446744073709551616
    };

    if abs_tick & 2 != 0 {
        ratio = (ratio * 18444899583751176498) >> 64;
    }
    if abs_tick & 4 != 0 {
        ratio = (ratio * 18443055278223354162) >> 64;
    }
    if abs_tick & 8 != 0 {
        ratio = (ratio * 18439367220385604838) >> 64;
    }
    if abs_tick & 16 != 0 {
        ratio = (ratio * 18431993317065449817) >> 64;
    }
    if abs_tick & 32 != 0 {
        ratio = (ratio * 18417254355718160513) >> 64;
    }
    if abs_tick & 64 != 0 {
        ratio = (ratio * 18387811781193591352) >> 64;
    }
    if abs_tick & 128 != 0 {
        ratio = (ratio * 18329067761203520168) >> 64;
    }
    if abs_tick & 256 != 0 {
        ratio = (ratio * 18212142134806087854) >> 64;
    }
    if abs_tick & 512 != 0 {
        ratio = (ratio * 17980523815641551639) >> 64;
    }
    if abs_tick & 1024 != 0 {
        ratio = (ratio * 17526086738831147013) >> 64;
    }
    if abs_tick & 2048 != 0 {
        ratio = (ratio * 16651378430235024244) >> 64;
    }
    if abs_tick & 4096 != 0 {
        ratio = (ratio * 15030750278693429944) >> 64;
    }
    if abs_tick & 8192 != 0 {
        ratio = (ratio * 12247334978882834399) >> 64;
    }
    if abs_tick & 16384 != 0 {
        ratio = (ratio * 8131365268884726200) >> 64;
    }
    if abs_tick & 32768 != 0 {
        ratio = (ratio * 3584323654723342297) >> 64;
    }
    if abs_tick & 65536 != 0 {
        ratio = (ratio * 696457651847595233) >> 64;
    }
    if abs_tick & 131072 != 0 {
        ratio = (ratio * 26294789957452057) >> 64;
    }
    if abs_tick & 262144 != 0 {
        ratio = (ratio * 37481735321082) >> 64;
    }

    ratio
}

fn mul_shift_96(n0: u128, n1: u128) -> u128 {
    let wide: U256 = (U256::from(n0) * U256::from(n1)) >> 96;
    wide.as_u128()
}
