use std::collections::HashMap;

use async_trait::async_trait;
use bridge_quote_core::CctpFee;

use super::CctpFeeSchedule;
use crate::{config::StaticFeeEntry, errors::BridgeError};

/// Fee schedule loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticFeeSchedule {
    entries: HashMap<(u32, u32, u32), CctpFee>,
}

impl StaticFeeSchedule {
    pub fn new(entries: impl IntoIterator<Item = StaticFeeEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| {
                    (
                        (e.source_domain, e.destination_domain, e.finality_threshold),
                        e.fee,
                    )
                })
                .collect(),
        }
    }

    pub fn with_entry(
        mut self,
        source_domain: u32,
        destination_domain: u32,
        finality_threshold: u32,
        fee: CctpFee,
    ) -> Self {
        self.entries
            .insert((source_domain, destination_domain, finality_threshold), fee);
        self
    }
}

#[async_trait]
impl CctpFeeSchedule for StaticFeeSchedule {
    async fn fee_entry(
        &self,
        source_domain: u32,
        destination_domain: u32,
        finality_threshold: u32,
    ) -> Result<CctpFee, BridgeError> {
        self.entries
            .get(&(source_domain, destination_domain, finality_threshold))
            .copied()
            .ok_or_else(|| {
                BridgeError::config_not_found(format!(
                    "CCTP fee for {source_domain} -> {destination_domain} at finality {finality_threshold}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    #[tokio::test]
    async fn test_lookup() {
        let schedule = StaticFeeSchedule::default().with_entry(
            3,
            19,
            1000,
            CctpFee {
                transfer_fee_bps: 1,
                forward_fee: U256::ZERO,
            },
        );
        assert_eq!(schedule.fee_entry(3, 19, 1000).await.unwrap().transfer_fee_bps, 1);
        assert!(matches!(
            schedule.fee_entry(3, 19, 2000).await,
            Err(BridgeError::UpstreamConfigNotFound(_))
        ));
    }
}
