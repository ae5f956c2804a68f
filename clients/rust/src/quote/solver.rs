//! Bounded iterative search for min-output quotes.
//!
//! This is a heuristic, not a solver: it re-applies the fee ratio observed
//! on the previous evaluation with slowly growing buffers and gives up after
//! `rounds * candidates_per_round` evaluations. Convergence is not
//! guaranteed for arbitrary fee curves.

use std::future::Future;

use alloy::primitives::U256;
use bridge_quote_core::{fees::mul_div_ceil, BPS_DENOMINATOR};

use crate::{
    config::SolverConfig,
    errors::{BridgeError, BridgeResult},
    types::BridgeQuote,
};

/// Anything the search can evaluate against the target.
pub trait SolverOutput {
    fn output_amount(&self) -> U256;
}

impl SolverOutput for BridgeQuote {
    fn output_amount(&self) -> U256 {
        self.output_amount
    }
}

impl SolverOutput for U256 {
    fn output_amount(&self) -> U256 {
        *self
    }
}

/// Find an input whose forward quote delivers at least `target`.
///
/// `seed` is the target expressed in input units. Candidates within one
/// round are evaluated concurrently and accepted in order.
pub async fn solve_min_output<T, F, Fut>(
    config: &SolverConfig,
    target: U256,
    seed: U256,
    forward: F,
) -> BridgeResult<T>
where
    T: SolverOutput,
    F: Fn(U256) -> Fut,
    Fut: Future<Output = BridgeResult<T>>,
{
    let scale = U256::from(BPS_DENOMINATOR);
    let mut adjusted = mul_div_ceil(seed, scale + U256::from(config.seed_buffer_bps), scale)?;
    let mut observed = forward(adjusted).await?.output_amount();

    let per_round = config.candidates_per_round;
    let mut attempts = 0u32;

    for round in 0..config.rounds {
        if observed.is_zero() {
            break;
        }

        let candidates = (0..per_round)
            .map(|i| {
                let buffer = U256::from(config.step_bps) * U256::from(round * per_round + i);
                let base = mul_div_ceil(target, adjusted, observed)?;
                mul_div_ceil(base, scale + buffer, scale)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let results =
            futures::future::try_join_all(candidates.iter().map(|candidate| forward(*candidate)))
                .await?;
        attempts += per_round;

        let mut last = None;
        for (candidate, result) in candidates.into_iter().zip(results) {
            if result.output_amount() >= target {
                tracing::debug!(round, attempts, %candidate, "Min-output search converged");
                return Ok(result);
            }
            last = Some((candidate, result.output_amount()));
        }

        if let Some((candidate, output)) = last {
            adjusted = candidate;
            observed = output;
        }
        tracing::debug!(round, %adjusted, %observed, %target, "Min-output search round missed");
    }

    tracing::warn!(attempts, %target, "Min-output search exhausted");
    Err(BridgeError::QuoteConvergenceFailure {
        target: target.to_string(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn linear(bps: u64) -> impl Fn(U256) -> std::future::Ready<BridgeResult<U256>> {
        move |input| {
            std::future::ready(Ok(input * U256::from(10_000 - bps) / U256::from(10_000u64)))
        }
    }

    #[tokio::test]
    async fn test_linear_fee_converges_first_candidate() {
        let target = U256::from(1_000_000u64);
        let calls = AtomicU32::new(0);
        let fee = linear(100);
        let out = solve_min_output(&SolverConfig::default(), target, target, |input| {
            calls.fetch_add(1, Ordering::SeqCst);
            fee(input)
        })
        .await
        .unwrap();
        assert!(out >= target);
        // indicative quote plus one round
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_price_impact_converges() {
        // output falls off faster than linearly with size
        let target = U256::from(10_000_000u64);
        let forward = |input: U256| {
            let impact = input / U256::from(1_000u64);
            std::future::ready(Ok::<_, BridgeError>(input - impact * U256::from(3u8)))
        };
        let out = solve_min_output(&SolverConfig::default(), target, target, forward)
            .await
            .unwrap();
        assert!(out >= target);
    }

    #[tokio::test]
    async fn test_exhaustion_is_convergence_failure() {
        let target = U256::from(1_000u64);
        let forward = |_input: U256| std::future::ready(Ok::<_, BridgeError>(U256::from(999u64)));
        let err = solve_min_output(&SolverConfig::default(), target, target, forward)
            .await
            .unwrap_err();
        match err {
            BridgeError::QuoteConvergenceFailure { attempts, .. } => assert_eq!(attempts, 9),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_forward_errors_propagate() {
        let forward = |_input: U256| {
            std::future::ready(Err::<U256, _>(BridgeError::upstream(
                "hyperliquid",
                anyhow::anyhow!("down"),
            )))
        };
        let err = solve_min_output(&SolverConfig::default(), U256::from(1u8), U256::from(1u8), forward)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Upstream { .. }));
    }

    proptest! {
        #[test]
        fn proptest_linear_fee_always_reaches_target(
            target in 1u64..1_000_000_000_000,
            bps in 0u64..500,
        ) {
            let target = U256::from(target);
            let out = futures::executor::block_on(solve_min_output(
                &SolverConfig::default(),
                target,
                target,
                linear(bps),
            ))
            .unwrap();
            prop_assert!(out >= target);
        }
    }
}
