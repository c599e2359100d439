//! Uniswap V3 price math on 256 bit integers.
//!
//! Prices are read from ticks: the price of token0 in token1 at tick `i` is
//! `1.0001^i`, stored by pools as its square root in Q64.96 fixed point.

use ethers_core::types::{Address, U256, U512};

use crate::Error;

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

/// `2^128 / sqrt(1.0001)^(2^i)` in Q128.128 for i in 1..=19, keyed by the tick bit.
const TICK_FACTORS: [(u32, u128); 19] = [
    (0x2, 0xfff97272373d413259a46990580e213a),
    (0x4, 0xfff2e50f5f656932ef12357cf3c7fdcc),
    (0x8, 0xffe5caca7e10e4e61c3624eaa0941cd0),
    (0x10, 0xffcb9843d60f6159c9db58835c926644),
    (0x20, 0xff973b41fa98c081472e6896dfb254c0),
    (0x40, 0xff2ea16466c96a3843ec78b326b52861),
    (0x80, 0xfe5dee046a99a2a811c461f1969c3053),
    (0x100, 0xfcbe86c7900a88aedcffc83b479aa3a4),
    (0x200, 0xf987a7253ac413176f2b074cf7815e54),
    (0x400, 0xf3392b0822b70005940c7a398e4b70f3),
    (0x800, 0xe7159475a2c29b7443b29c7fa6e889d9),
    (0x1000, 0xd097f3bdfd2022b8845ad8f792aa5825),
    (0x2000, 0xa9f746462d870fdf8a65dc1f90e061e5),
    (0x4000, 0x70d869a156d2a1b890bb3df62baf32f7),
    (0x8000, 0x31be135f97d08fd981231505542fcfa6),
    (0x10000, 0x9aa508b5b7a84e1c677de54f3e99bc9),
    (0x20000, 0x5d6af8dedb81196699c329225ee604),
    (0x40000, 0x2216e584f5fa1ea926041bedfe98),
    (0x80000, 0x48a170391f7dc42444e8fa2),
];

const TICK_BIT_0_FACTOR: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// Computes `a * b / denominator` rounding down, with a 512 bit intermediate product.
/// Returns `None` on division by zero or when the result does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }

    let result = a.full_mul(b) / U512::from(denominator);
    U256::try_from(result).ok()
}

/// Returns `sqrt(1.0001^tick) * 2^96`, rounded up.
pub fn sqrt_ratio_at_tick(tick: i32) -> Result<U256, Error> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(Error::Format(format!("tick {} out of range", tick)));
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(TICK_BIT_0_FACTOR)
    } else {
        U256::one() << 128usize
    };

    for (bit, factor) in TICK_FACTORS {
        if abs_tick & bit != 0 {
            ratio = (ratio * U256::from(factor)) >> 128usize;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up
    let remainder = ratio & U256::from(u32::MAX);
    let round_up = if remainder.is_zero() { U256::zero() } else { U256::one() };

    Ok((ratio >> 32usize) + round_up)
}

/// Amount of `quote_token` received for `base_amount` of `base_token` at `tick`,
/// where the tick is the one of the `base_token`/`quote_token` pool.
pub fn quote_at_tick(tick: i32, base_amount: U256, base_token: Address, quote_token: Address) -> Result<Option<U256>, Error> {
    let sqrt_ratio = sqrt_ratio_at_tick(tick)?;

    // Squaring needs to fit in 256 bits, otherwise go through Q128
    let quote = if sqrt_ratio <= U256::from(u128::MAX) {
        let ratio = sqrt_ratio * sqrt_ratio;
        let q192 = U256::one() << 192usize;

        if base_token < quote_token {
            mul_div(ratio, base_amount, q192)
        } else {
            mul_div(q192, base_amount, ratio)
        }
    } else {
        let q128 = U256::one() << 128usize;
        let ratio = match mul_div(sqrt_ratio, sqrt_ratio, U256::one() << 64usize) {
            Some(ratio) => ratio,
            None => return Ok(None),
        };

        if base_token < quote_token {
            mul_div(ratio, base_amount, q128)
        } else {
            mul_div(q128, base_amount, ratio)
        }
    };

    Ok(quote)
}

/// Arithmetic mean tick between two tick accumulator readings taken `interval`
/// seconds apart, rounded toward negative infinity.
pub fn average_tick(start: i64, end: i64, interval: u32) -> Result<i32, Error> {
    if interval == 0 {
        return Err(Error::Format("empty observation interval".to_string()));
    }

    let tick = (end - start).div_euclid(interval as i64);
    i32::try_from(tick).map_err(|_| Error::Format(format!("average tick {} out of range", tick)))
}
