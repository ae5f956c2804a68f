use alloy::primitives::U256;

use crate::error::{CoreError, CoreResult};

pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fixed-point scale for fee percentages (`1e18` = 100%).
pub const PCT_SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// CCTP fee parameters for one route and transfer mode.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CctpFee {
    pub transfer_fee_bps: u32,
    /// Flat fee in bridged-token units, charged only on forwarded routes.
    pub forward_fee: U256,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct FeeResult {
    pub fees_generated: U256,
    pub amount_after_fees: U256,
}

fn bps(value: u32) -> CoreResult<U256> {
    if value as u64 > BPS_DENOMINATOR {
        return Err(CoreError::InvalidBps(value as u64));
    }
    Ok(U256::from(value))
}

pub fn mul_div(value: U256, numerator: U256, denominator: U256) -> CoreResult<U256> {
    if denominator.is_zero() {
        return Err(CoreError::NumericalOverflow("division by zero"));
    }
    Ok(value
        .checked_mul(numerator)
        .ok_or(CoreError::NumericalOverflow("mul_div"))?
        / denominator)
}

pub fn mul_div_ceil(value: U256, numerator: U256, denominator: U256) -> CoreResult<U256> {
    if denominator.is_zero() {
        return Err(CoreError::NumericalOverflow("division by zero"));
    }
    let product = value
        .checked_mul(numerator)
        .ok_or(CoreError::NumericalOverflow("mul_div_ceil"))?;
    let quotient = product / denominator;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1u8))
    }
}

/// `fee = amount * bps / 10000 + forward_fee`, truncating the bps part.
pub fn calculate_cctp_fee(amount: U256, fee: &CctpFee) -> CoreResult<FeeResult> {
    let fees_generated = mul_div(amount, bps(fee.transfer_fee_bps)?, U256::from(BPS_DENOMINATOR))?
        .checked_add(fee.forward_fee)
        .ok_or(CoreError::NumericalOverflow("fee calculation"))?;

    Ok(FeeResult {
        fees_generated,
        amount_after_fees: amount.checked_sub(fees_generated).ok_or_else(|| {
            CoreError::AmountBelowFees {
                amount: amount.to_string(),
                fees: fees_generated.to_string(),
            }
        })?,
    })
}

/// Smallest input whose [`calculate_cctp_fee`] output is at least `target`:
/// `ceil((target + forward_fee) * 10000 / (10000 - bps))`.
pub fn invert_linear_fee(target: U256, fee: &CctpFee) -> CoreResult<U256> {
    let rate = bps(fee.transfer_fee_bps)?;
    let denominator = U256::from(BPS_DENOMINATOR) - rate;
    if denominator.is_zero() {
        return Err(CoreError::InvalidBps(fee.transfer_fee_bps as u64));
    }
    let gross = target
        .checked_add(fee.forward_fee)
        .ok_or(CoreError::NumericalOverflow("fee inversion"))?;
    mul_div_ceil(gross, U256::from(BPS_DENOMINATOR), denominator)
}

/// `ceil(max_fee * 10000 / amount)`
pub fn max_fee_bps_ceil(max_fee: U256, amount: U256) -> CoreResult<U256> {
    if amount.is_zero() {
        return Err(CoreError::ZeroAmount);
    }
    mul_div_ceil(max_fee, U256::from(BPS_DENOMINATOR), amount)
}

/// Fee as a `1e18`-scaled fraction of `amount`. Zero amounts yield zero.
pub fn fee_pct(fee: U256, amount: U256) -> CoreResult<U256> {
    if amount.is_zero() {
        return Ok(U256::ZERO);
    }
    mul_div(fee, PCT_SCALE, amount)
}

/// `amount * (10000 - bps) / 10000`
pub fn deduct_bps(amount: U256, value: u32) -> CoreResult<U256> {
    let rate = bps(value)?;
    mul_div(amount, U256::from(BPS_DENOMINATOR) - rate, U256::from(BPS_DENOMINATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fee(bps: u32, forward: u64) -> CctpFee {
        CctpFee {
            transfer_fee_bps: bps,
            forward_fee: U256::from(forward),
        }
    }

    #[test]
    fn test_simple_values() {
        let result = calculate_cctp_fee(U256::from(1_000_000u64), &fee(1, 0)).unwrap();
        assert_eq!(result.fees_generated, U256::from(100u64));
        assert_eq!(result.amount_after_fees, U256::from(999_900u64));
    }

    #[test]
    fn test_forward_fee_added() {
        let result = calculate_cctp_fee(U256::from(10_000_000u64), &fee(2, 200_000)).unwrap();
        assert_eq!(result.fees_generated, U256::from(202_000u64));
        assert_eq!(result.amount_after_fees, U256::from(9_798_000u64));
    }

    #[test]
    fn test_zero_fee_rate() {
        let result = calculate_cctp_fee(U256::from(1_000_000u64), &fee(0, 0)).unwrap();
        assert_eq!(result.fees_generated, U256::ZERO);
    }

    #[test]
    fn test_amount_below_fees() {
        let err = calculate_cctp_fee(U256::from(100u64), &fee(1, 1_000)).unwrap_err();
        assert!(matches!(err, CoreError::AmountBelowFees { .. }));
    }

    #[test]
    fn test_invalid_bps() {
        assert!(calculate_cctp_fee(U256::from(1u64), &fee(10_001, 0)).is_err());
        assert!(invert_linear_fee(U256::from(1u64), &fee(10_000, 0)).is_err());
    }

    #[test]
    fn test_max_fee_bps_scenario() {
        // 1 USDC with a 100 unit fee is exactly 1 bps
        assert_eq!(
            max_fee_bps_ceil(U256::from(100u64), U256::from(1_000_000u64)).unwrap(),
            U256::from(1u64)
        );
        // any remainder rounds up
        assert_eq!(
            max_fee_bps_ceil(U256::from(101u64), U256::from(1_000_000u64)).unwrap(),
            U256::from(2u64)
        );
        assert_eq!(max_fee_bps_ceil(U256::ZERO, U256::from(5u64)).unwrap(), U256::ZERO);
        assert!(max_fee_bps_ceil(U256::from(1u64), U256::ZERO).is_err());
    }

    #[test]
    fn test_fee_pct() {
        let pct = fee_pct(U256::from(100u64), U256::from(1_000_000u64)).unwrap();
        // 0.01% == 1e14
        assert_eq!(pct, U256::from(100_000_000_000_000u64));
    }

    #[test]
    fn test_deduct_bps() {
        assert_eq!(
            deduct_bps(U256::from(1_000_000u64), 50).unwrap(),
            U256::from(995_000u64)
        );
    }

    proptest! {
        #[test]
        fn proptest_fees_never_negative(
            amount in 1u64..u64::MAX,
            rate in 0u32..=10_000,
            forward in 0u64..1_000_000,
        ) {
            let fee = fee(rate, forward);
            if let Ok(result) = calculate_cctp_fee(U256::from(amount), &fee) {
                prop_assert!(result.amount_after_fees <= U256::from(amount));
                prop_assert_eq!(result.amount_after_fees + result.fees_generated, U256::from(amount));
            }
        }

        #[test]
        fn proptest_inverse_meets_target(
            target in 1u64..1_000_000_000_000,
            rate in 0u32..1_000,
            forward in 0u64..1_000_000,
        ) {
            let fee = fee(rate, forward);
            let input = invert_linear_fee(U256::from(target), &fee).unwrap();
            let output = calculate_cctp_fee(input, &fee).unwrap().amount_after_fees;
            prop_assert!(output >= U256::from(target));
        }
    }
}
