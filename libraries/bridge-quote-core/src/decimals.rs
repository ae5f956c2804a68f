//! Decimal precision conversion.
//!
//! Shrinking truncates toward zero, matching on-chain token semantics. The
//! dropped remainder is intentionally not carried anywhere.

use alloy::primitives::U256;

use crate::error::{CoreError, CoreResult};

fn pow10(exp: u8) -> CoreResult<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .ok_or(CoreError::NumericalOverflow("decimal scale"))
}

/// Convert `amount` from `from_decimals` to `to_decimals` precision.
pub fn convert_decimals(amount: U256, from_decimals: u8, to_decimals: u8) -> CoreResult<U256> {
    if amount.is_zero() || from_decimals == to_decimals {
        return Ok(amount);
    }
    if from_decimals > to_decimals {
        Ok(amount / pow10(from_decimals - to_decimals)?)
    } else {
        amount
            .checked_mul(pow10(to_decimals - from_decimals)?)
            .ok_or(CoreError::NumericalOverflow("decimal conversion"))
    }
}

/// Like [`convert_decimals`] but rounds up when shrinking, so that converting
/// the result back never lands below `amount`.
pub fn convert_decimals_ceil(amount: U256, from_decimals: u8, to_decimals: u8) -> CoreResult<U256> {
    if from_decimals <= to_decimals {
        return convert_decimals(amount, from_decimals, to_decimals);
    }
    let scale = pow10(from_decimals - to_decimals)?;
    let quotient = amount / scale;
    if (amount % scale).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identity_when_equal() {
        let amount = U256::from(123_456_789u64);
        assert_eq!(convert_decimals(amount, 6, 6).unwrap(), amount);
    }

    #[test]
    fn test_shrink_truncates() {
        // 1.999999999999999999 (18) -> 1.999999 (6)
        let amount = U256::from(1_999_999_999_999_999_999u64);
        assert_eq!(convert_decimals(amount, 18, 6).unwrap(), U256::from(1_999_999u64));
        assert_eq!(convert_decimals(U256::from(999u64), 18, 6).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_grow_scales() {
        assert_eq!(
            convert_decimals(U256::from(1_000_000u64), 6, 8).unwrap(),
            U256::from(100_000_000u64)
        );
    }

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(convert_decimals(U256::ZERO, 6, 18).unwrap(), U256::ZERO);
        assert_eq!(convert_decimals(U256::ZERO, 18, 6).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_grow_overflow_is_error() {
        assert!(convert_decimals(U256::MAX, 0, 18).is_err());
    }

    #[test]
    fn test_ceil_rounds_up_remainder() {
        assert_eq!(
            convert_decimals_ceil(U256::from(100_000_001u64), 8, 6).unwrap(),
            U256::from(1_000_001u64)
        );
        assert_eq!(
            convert_decimals_ceil(U256::from(100_000_000u64), 8, 6).unwrap(),
            U256::from(1_000_000u64)
        );
    }

    proptest! {
        #[test]
        fn proptest_identity(amount in any::<u128>(), decimals in 0u8..=30) {
            let amount = U256::from(amount);
            prop_assert_eq!(convert_decimals(amount, decimals, decimals).unwrap(), amount);
        }

        #[test]
        fn proptest_round_trip_6_18(amount in any::<u64>()) {
            let amount = U256::from(amount);
            let grown = convert_decimals(amount, 6, 18).unwrap();
            prop_assert_eq!(convert_decimals(grown, 18, 6).unwrap(), amount);
        }

        #[test]
        fn proptest_ceil_never_under_delivers(target in any::<u64>()) {
            let target = U256::from(target);
            let input = convert_decimals_ceil(target, 8, 6).unwrap();
            prop_assert!(convert_decimals(input, 6, 8).unwrap() >= target);
        }
    }
}
