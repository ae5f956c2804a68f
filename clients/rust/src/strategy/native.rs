use std::sync::Arc;

use alloy::primitives::U256;
use bridge_quote_core::{Ecosystem, PeripheryKind};

use crate::{
    assembler::{DepositPlan, TransactionAssembler},
    client::BridgeContext,
    errors::BridgeResult,
    quote::QuoteEngine,
    types::{BridgeQuote, CrossSwap, Route, UnsignedTransaction},
};

/// Intent deposits into the origin spoke pool, filled by relayers.
#[derive(Clone)]
pub struct NativeIntentStrategy {
    ctx: Arc<BridgeContext>,
    engine: QuoteEngine,
    assembler: TransactionAssembler,
}

impl NativeIntentStrategy {
    pub fn new(ctx: Arc<BridgeContext>) -> Self {
        Self {
            engine: QuoteEngine::new(ctx.clone()),
            assembler: TransactionAssembler::new(ctx.clone()),
            ctx,
        }
    }

    pub fn is_route_supported(&self, route: &Route<'_>) -> bool {
        let chains = &self.ctx.config.chains;
        route.input_token.ecosystem() == Ecosystem::Evm
            && route.origin_chain_id() != route.destination_chain_id()
            && chains.has_periphery(route.origin_chain_id(), PeripheryKind::SpokePool)
            && chains.has_periphery(route.destination_chain_id(), PeripheryKind::SpokePool)
            && route.output_token.is_symbol(&route.input_token.symbol)
            && !route.input_token.address.is_zero()
    }

    pub async fn quote_exact_input(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<BridgeQuote> {
        self.engine.intent_exact_input(swap, amount).await
    }

    pub async fn quote_min_output(&self, swap: &CrossSwap, target: U256) -> BridgeResult<BridgeQuote> {
        self.engine.intent_min_output(swap, target).await
    }

    pub async fn build_transaction(
        &self,
        swap: &CrossSwap,
        quote: &BridgeQuote,
    ) -> BridgeResult<UnsignedTransaction> {
        self.assembler
            .assemble(swap, DepositPlan::SpokePool { quote })
            .await
    }
}
