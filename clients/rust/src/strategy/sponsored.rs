use std::sync::Arc;

use alloy::primitives::U256;
use bridge_quote_core::PeripheryKind;

use crate::{
    assembler::{DepositPlan, TransactionAssembler},
    client::BridgeContext,
    errors::BridgeResult,
    quote::QuoteEngine,
    sponsorship::SponsorshipQuoteBuilder,
    types::{BridgeQuote, CrossSwap, Route, UnsignedTransaction},
};

/// CCTP into account-activation destinations with the fee paid by a sponsor.
#[derive(Clone)]
pub struct SponsoredCctpStrategy {
    ctx: Arc<BridgeContext>,
    engine: QuoteEngine,
    sponsorship: SponsorshipQuoteBuilder,
    assembler: TransactionAssembler,
}

impl SponsoredCctpStrategy {
    pub fn new(ctx: Arc<BridgeContext>) -> Self {
        Self {
            engine: QuoteEngine::new(ctx.clone()),
            sponsorship: SponsorshipQuoteBuilder::new(ctx.clone()),
            assembler: TransactionAssembler::new(ctx.clone()),
            ctx,
        }
    }

    pub fn is_route_supported(&self, route: &Route<'_>) -> bool {
        let config = &self.ctx.config;
        let chains = &config.chains;
        let origin = route.origin_chain_id();
        let destination = route.destination_chain_id();
        let handler_chain = chains.forwarded_via(destination).unwrap_or(destination);

        chains.has_periphery(origin, PeripheryKind::SponsoredSrcPeriphery)
            && chains.has_domain(origin)
            && chains.has_domain(destination)
            && chains.requires_account_activation(destination)
            && chains.has_periphery(handler_chain, PeripheryKind::SponsoredDstHandler)
            && config.is_stable(route.input_token)
            && (config.is_stable(route.output_token)
                || config
                    .sponsorship
                    .allows_final_token(&route.output_token.symbol))
    }

    pub async fn quote_exact_input(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<BridgeQuote> {
        SponsorshipQuoteBuilder::validate(swap)?;
        self.engine.sponsored_exact_input(swap, amount).await
    }

    pub async fn quote_min_output(&self, swap: &CrossSwap, target: U256) -> BridgeResult<BridgeQuote> {
        SponsorshipQuoteBuilder::validate(swap)?;
        self.engine.sponsored_min_output(swap, target).await
    }

    pub async fn build_transaction(
        &self,
        swap: &CrossSwap,
        quote: &BridgeQuote,
    ) -> BridgeResult<UnsignedTransaction> {
        let signed = self.sponsorship.build(swap, quote).await?;
        self.assembler
            .assemble(
                swap,
                DepositPlan::Sponsored {
                    quote,
                    signed: &signed,
                },
            )
            .await
    }
}
