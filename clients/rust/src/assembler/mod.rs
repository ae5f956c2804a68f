//! Unsigned deposit transactions for EVM and SVM origins.

mod evm;
mod svm;

use std::sync::Arc;

use alloy::primitives::{Bytes, B256, U256};
use alloy::sol_types::SolValue;
use bridge_quote_core::{ChainDomainRegistry, Ecosystem, PeripheryKind};

use crate::{
    client::BridgeContext,
    constants::{INTEGRATOR_DELIMITER, SWAP_API_MARKER},
    errors::{BridgeError, BridgeResult},
    types::{BridgeQuote, CrossSwap, IntegratorId, SignedSponsoredQuote, UnsignedTransaction},
};

pub use evm::{ISpokePool, ITokenMessengerV2};

/// What the deposit transaction has to do.
#[derive(Debug, Clone, Copy)]
pub enum DepositPlan<'a> {
    SpokePool {
        quote: &'a BridgeQuote,
    },
    Cctp {
        quote: &'a BridgeQuote,
    },
    Sponsored {
        quote: &'a BridgeQuote,
        signed: &'a SignedSponsoredQuote,
    },
}

impl DepositPlan<'_> {
    pub fn quote(&self) -> &BridgeQuote {
        match self {
            DepositPlan::SpokePool { quote }
            | DepositPlan::Cctp { quote }
            | DepositPlan::Sponsored { quote, .. } => quote,
        }
    }
}

/// `0x1dc0de ‖ integrator id` when present, then `0x73c0de`.
pub fn deposit_tags(integrator_id: Option<IntegratorId>) -> Vec<u8> {
    let mut tags = Vec::with_capacity(8);
    if let Some(id) = integrator_id {
        tags.extend_from_slice(&INTEGRATOR_DELIMITER);
        tags.extend_from_slice(&id.0);
    }
    tags.extend_from_slice(&SWAP_API_MARKER);
    tags
}

/// Arguments of a plain CCTP v2 burn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CctpBurnTerms {
    pub destination_domain: u32,
    pub mint_recipient: B256,
    pub destination_caller: B256,
    pub max_fee: U256,
    pub min_finality_threshold: u32,
    /// Set on forwarded routes; the forwarder reads the final recipient from it.
    pub hook_data: Option<Bytes>,
}

impl CctpBurnTerms {
    pub fn new(chains: &ChainDomainRegistry, swap: &CrossSwap, quote: &BridgeQuote) -> BridgeResult<Self> {
        let mode = quote
            .transfer_mode
            .ok_or_else(|| BridgeError::invalid_param("CCTP quote without a transfer mode"))?;
        let max_fee = quote
            .cctp_max_fee
            .ok_or_else(|| BridgeError::invalid_param("CCTP quote without a max fee"))?;
        let destination = swap.destination_chain_id();
        let destination_domain = chains.domain_id(destination)?;
        let recipient = swap.recipient.to_bytes32();

        let terms = match chains.forwarded_via(destination) {
            Some(via) => {
                let forwarder = chains
                    .periphery_address(via, PeripheryKind::CctpForwarder)?
                    .to_bytes32();
                CctpBurnTerms {
                    destination_domain,
                    mint_recipient: forwarder,
                    destination_caller: forwarder,
                    max_fee,
                    min_finality_threshold: mode.finality_threshold(),
                    hook_data: Some(recipient.abi_encode().into()),
                }
            }
            None => CctpBurnTerms {
                destination_domain,
                mint_recipient: recipient,
                destination_caller: B256::ZERO,
                max_fee,
                min_finality_threshold: mode.finality_threshold(),
                hook_data: None,
            },
        };
        Ok(terms)
    }
}

#[derive(Clone)]
pub struct TransactionAssembler {
    ctx: Arc<BridgeContext>,
}

impl TransactionAssembler {
    pub fn new(ctx: Arc<BridgeContext>) -> Self {
        Self { ctx }
    }

    pub async fn assemble(&self, swap: &CrossSwap, plan: DepositPlan<'_>) -> BridgeResult<UnsignedTransaction> {
        let config = &self.ctx.config;
        let tx = match swap.origin_ecosystem() {
            Ecosystem::Evm => evm::build(config, swap, plan)?,
            Ecosystem::Svm => {
                let blockhash = self.ctx.svm.latest_blockhash().await?;
                svm::build(config, swap, plan, blockhash)?
            }
        };

        tracing::info!(
            chain_id = tx.chain_id(),
            ecosystem = %tx.ecosystem(),
            provider = %plan.quote().provider,
            input_amount = %plan.quote().input_amount,
            "Deposit transaction assembled"
        );
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_tags_without_integrator() {
        assert_eq!(deposit_tags(None), hex!("73c0de").to_vec());
    }

    #[test]
    fn test_tags_with_integrator() {
        let id = IntegratorId([0xab, 0xcd]);
        assert_eq!(deposit_tags(Some(id)), hex!("1dc0deabcd73c0de").to_vec());
    }
}
