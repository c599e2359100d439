use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::BigDecimal;
use ethers_core::types::U256;

pub fn u256_to_bigint(value: U256) -> BigInt {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);

    BigInt::from_bytes_be(Sign::Plus, &bytes)
}

/// Scales down an integer amount expressed with `decimals` decimals, e.g.
/// `1500000` with 6 decimals gives `1.500000`.
pub fn format_units(amount: U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(u256_to_bigint(amount), decimals as i64)
}

/// `10^decimals`, i.e. one whole unit of a token with `decimals` decimals.
/// Returns `None` when the unit does not fit in 256 bits (`decimals > 77`).
pub fn one_unit(decimals: u8) -> Option<U256> {
    U256::from(10).checked_pow(U256::from(decimals))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use ethers_core::types::U256;

    use super::*;

    #[test]
    fn test_format_units() {
        let result = format_units(U256::from(1_500_000u64), 6);
        assert_eq!(result, BigDecimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_format_units_large_value() {
        let result = format_units(U256::MAX, 18);
        let expected = BigDecimal::from_str("115792089237316195423570985008687907853269984665640564039457.584007913129639935").unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_one_unit() {
        assert_eq!(one_unit(0), Some(U256::one()));
        assert_eq!(one_unit(18), Some(U256::from(1_000_000_000_000_000_000u64)));
        assert_eq!(one_unit(77), Some(U256::exp10(77)));
    }

    #[test]
    fn test_one_unit_overflow() {
        assert_eq!(one_unit(78), None);
        assert_eq!(one_unit(u8::MAX), None);
    }
}
