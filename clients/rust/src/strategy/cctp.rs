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

/// Plain CCTP v2 burn and mint. The user pays the CCTP fee.
#[derive(Clone)]
pub struct CctpStrategy {
    ctx: Arc<BridgeContext>,
    engine: QuoteEngine,
    assembler: TransactionAssembler,
}

impl CctpStrategy {
    pub fn new(ctx: Arc<BridgeContext>) -> Self {
        Self {
            engine: QuoteEngine::new(ctx.clone()),
            assembler: TransactionAssembler::new(ctx.clone()),
            ctx,
        }
    }

    pub fn is_route_supported(&self, route: &Route<'_>) -> bool {
        let config = &self.ctx.config;
        let chains = &config.chains;
        let origin = route.origin_chain_id();
        let destination = route.destination_chain_id();

        if origin == destination
            || !config.is_stable(route.input_token)
            || !config.is_stable(route.output_token)
            || !chains.has_domain(origin)
            || !chains.has_domain(destination)
        {
            return false;
        }

        let origin_ready = match route.input_token.ecosystem() {
            Ecosystem::Evm => chains.has_periphery(origin, PeripheryKind::TokenMessenger),
            Ecosystem::Svm => true,
        };
        let destination_ready = match chains.forwarded_via(destination) {
            // forwarding needs a hook, which only the EVM burn supports
            Some(via) => {
                route.input_token.ecosystem() == Ecosystem::Evm
                    && chains.has_periphery(via, PeripheryKind::CctpForwarder)
            }
            None => true,
        };
        origin_ready && destination_ready
    }

    pub async fn quote_exact_input(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<BridgeQuote> {
        let leg = self.engine.cctp_exact_input(swap, amount, true).await?;
        self.engine.cctp_quote(swap, amount, &leg)
    }

    pub async fn quote_min_output(&self, swap: &CrossSwap, target: U256) -> BridgeResult<BridgeQuote> {
        let (input, leg) = self.engine.cctp_min_output(swap, target, true).await?;
        self.engine.cctp_quote(swap, input, &leg)
    }

    pub async fn build_transaction(
        &self,
        swap: &CrossSwap,
        quote: &BridgeQuote,
    ) -> BridgeResult<UnsignedTransaction> {
        self.assembler.assemble(swap, DepositPlan::Cctp { quote }).await
    }
}
