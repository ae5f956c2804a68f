//! Fee model: transfer-mode selection and CCTP fee lookup.

use std::sync::Arc;

use alloy::primitives::U256;
use bridge_quote_core::{CctpFee, ChainId, TransferMode};

use crate::{api::CctpFeeSchedule, config::EngineConfig, errors::BridgeResult};

/// Origin and destination chain of a CCTP transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CctpRoute {
    pub origin_chain_id: ChainId,
    pub destination_chain_id: ChainId,
}

#[derive(Clone)]
pub struct FeeModel {
    config: Arc<EngineConfig>,
    schedule: Arc<dyn CctpFeeSchedule>,
}

impl FeeModel {
    pub fn new(config: Arc<EngineConfig>, schedule: Arc<dyn CctpFeeSchedule>) -> Self {
        Self { config, schedule }
    }

    /// Pick the transfer mode for `amount` leaving `chain_id`.
    ///
    /// Fast is only used when the chain has a fast-transfer limit and the
    /// amount, in base units, does not exceed it. Everything else is Standard.
    pub fn select_transfer_mode(
        &self,
        chain_id: ChainId,
        requested: Option<TransferMode>,
        amount: U256,
        decimals: u8,
    ) -> TransferMode {
        let requested = requested.unwrap_or(TransferMode::Fast);
        if requested == TransferMode::Standard {
            return TransferMode::Standard;
        }

        let Some(limit_units) = self.fast_limit_units(chain_id, decimals) else {
            tracing::debug!(chain_id, "Fast transfers unavailable, using standard");
            return TransferMode::Standard;
        };

        if amount > limit_units {
            tracing::debug!(
                chain_id,
                %amount,
                %limit_units,
                "Amount above fast transfer limit, using standard"
            );
            return TransferMode::Standard;
        }

        TransferMode::Fast
    }

    /// Largest amount, in base units, that may still leave `chain_id` in Fast mode.
    pub fn fast_limit_units(&self, chain_id: ChainId, decimals: u8) -> Option<U256> {
        let limit = self.config.chains.fast_transfer_limit(chain_id)?;
        Some(
            U256::from(10u64)
                .checked_pow(U256::from(decimals))
                .and_then(|scale| scale.checked_mul(U256::from(limit)))
                .unwrap_or(U256::MAX),
        )
    }

    /// Fee parameters for `route` in `mode`.
    ///
    /// The forward fee is only kept when `use_forward_fee` is set and the
    /// destination is reached through a forwarding chain.
    pub async fn compute_cctp_fee(
        &self,
        route: CctpRoute,
        mode: TransferMode,
        use_forward_fee: bool,
    ) -> BridgeResult<CctpFee> {
        let chains = &self.config.chains;
        let source_domain = chains.domain_id(route.origin_chain_id)?;
        let destination_domain = chains.domain_id(route.destination_chain_id)?;

        let mut fee = self
            .schedule
            .fee_entry(source_domain, destination_domain, mode.finality_threshold())
            .await?;

        if !(use_forward_fee && chains.is_forwarded(route.destination_chain_id)) {
            fee.forward_fee = U256::ZERO;
        }

        tracing::debug!(
            source_domain,
            destination_domain,
            ?mode,
            bps = fee.transfer_fee_bps,
            forward_fee = %fee.forward_fee,
            "CCTP fee"
        );
        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::StaticFeeSchedule, errors::BridgeError};
    use bridge_quote_core::{
        chains::{ARBITRUM_CHAIN_ID, BASE_CHAIN_ID, HYPERCORE_CHAIN_ID, HYPEREVM_CHAIN_ID},
        ChainInfo,
    };

    fn model() -> FeeModel {
        let config = EngineConfig::builder()
            .chains([
                ChainInfo::evm(ARBITRUM_CHAIN_ID, "arbitrum")
                    .with_domain(3)
                    .with_fast_limit(1_000),
                ChainInfo::evm(BASE_CHAIN_ID, "base").with_domain(6),
                ChainInfo::evm(HYPEREVM_CHAIN_ID, "hyperevm").with_domain(19),
                ChainInfo::evm(HYPERCORE_CHAIN_ID, "hypercore").with_forwarding(HYPEREVM_CHAIN_ID),
            ])
            .tokens([])
            .build()
            .unwrap();
        let fee = |bps, forward: u64| CctpFee {
            transfer_fee_bps: bps,
            forward_fee: U256::from(forward),
        };
        let schedule = StaticFeeSchedule::default()
            .with_entry(3, 19, 1000, fee(1, 200_000))
            .with_entry(3, 6, 2000, fee(0, 200_000));
        FeeModel::new(Arc::new(config), Arc::new(schedule))
    }

    #[test]
    fn test_mode_selection() {
        let model = model();
        let usdc = |whole: u64| U256::from(whole) * U256::from(1_000_000u64);

        assert_eq!(
            model.select_transfer_mode(ARBITRUM_CHAIN_ID, None, usdc(10), 6),
            TransferMode::Fast
        );
        assert_eq!(
            model.select_transfer_mode(ARBITRUM_CHAIN_ID, Some(TransferMode::Fast), usdc(1_000), 6),
            TransferMode::Fast
        );
        // above the limit
        assert_eq!(
            model.select_transfer_mode(ARBITRUM_CHAIN_ID, Some(TransferMode::Fast), usdc(1_001), 6),
            TransferMode::Standard
        );
        // fractional amounts just above the limit
        assert_eq!(
            model.select_transfer_mode(ARBITRUM_CHAIN_ID, None, usdc(1_000) + U256::from(1u8), 6),
            TransferMode::Standard
        );
        assert_eq!(
            model.select_transfer_mode(ARBITRUM_CHAIN_ID, None, U256::from(1_000_999_999u64), 6),
            TransferMode::Standard
        );
        // chain without fast support
        assert_eq!(
            model.select_transfer_mode(BASE_CHAIN_ID, Some(TransferMode::Fast), usdc(1), 6),
            TransferMode::Standard
        );
        assert_eq!(
            model.select_transfer_mode(ARBITRUM_CHAIN_ID, Some(TransferMode::Standard), usdc(1), 6),
            TransferMode::Standard
        );
    }

    #[tokio::test]
    async fn test_forward_fee_only_on_forwarded_routes() {
        let model = model();
        let to_core = CctpRoute {
            origin_chain_id: ARBITRUM_CHAIN_ID,
            destination_chain_id: HYPERCORE_CHAIN_ID,
        };
        let with_forward = model
            .compute_cctp_fee(to_core, TransferMode::Fast, true)
            .await
            .unwrap();
        assert_eq!(with_forward.forward_fee, U256::from(200_000u64));

        let without = model
            .compute_cctp_fee(to_core, TransferMode::Fast, false)
            .await
            .unwrap();
        assert_eq!(without.forward_fee, U256::ZERO);

        // entry carries a forward fee but the destination is not forwarded
        let to_base = CctpRoute {
            origin_chain_id: ARBITRUM_CHAIN_ID,
            destination_chain_id: BASE_CHAIN_ID,
        };
        let direct = model
            .compute_cctp_fee(to_base, TransferMode::Standard, true)
            .await
            .unwrap();
        assert_eq!(direct.forward_fee, U256::ZERO);
    }

    #[tokio::test]
    async fn test_missing_schedule_entry() {
        let route = CctpRoute {
            origin_chain_id: ARBITRUM_CHAIN_ID,
            destination_chain_id: BASE_CHAIN_ID,
        };
        let err = model()
            .compute_cctp_fee(route, TransferMode::Fast, false)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::UpstreamConfigNotFound(_)));
    }
}
