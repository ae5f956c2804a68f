//! Sponsored CCTP authorizations.
//!
//! The sponsor pays the CCTP fee (and any conversion loss up to
//! `maxBpsToSponsor`) so the user receives face value on the destination.
//! The periphery contract only accepts quotes signed by the sponsor key.

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use alloy::primitives::{Bytes, U256};
use bridge_quote_core::{
    calculate_cctp_fee, convert_decimals,
    fees::mul_div_ceil,
    generate_nonce, max_fee_bps_ceil, ExecutionMode, PeripheryKind, SponsoredQuote,
    BPS_DENOMINATOR,
};

use crate::{
    client::BridgeContext,
    errors::{BridgeError, BridgeResult},
    quote::QuoteEngine,
    types::{BridgeQuote, CrossSwap, SignedSponsoredQuote},
};

#[derive(Clone)]
pub struct SponsorshipQuoteBuilder {
    ctx: Arc<BridgeContext>,
    engine: QuoteEngine,
}

impl SponsorshipQuoteBuilder {
    pub fn new(ctx: Arc<BridgeContext>) -> Self {
        let engine = QuoteEngine::new(ctx.clone());
        Self { ctx, engine }
    }

    /// Requests the sponsor will never sign for.
    pub fn validate(swap: &CrossSwap) -> BridgeResult<()> {
        if swap.has_app_fee() {
            return Err(BridgeError::invalid_param(
                "app fees are not supported for sponsored transfers",
            ));
        }
        if swap.origin_swap.is_some() {
            return Err(BridgeError::invalid_param(
                "origin swaps are not supported for sponsored transfers",
            ));
        }
        if swap.destination_swap.is_some() {
            return Err(BridgeError::invalid_param(
                "destination swaps are not supported for sponsored transfers",
            ));
        }
        Ok(())
    }

    pub async fn build(&self, swap: &CrossSwap, quote: &BridgeQuote) -> BridgeResult<SignedSponsoredQuote> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| BridgeError::Internal(e.into()))?
            .as_millis();
        let now_ms = u64::try_from(now_ms).map_err(|e| BridgeError::Internal(e.into()))?;
        self.build_at(swap, quote, now_ms).await
    }

    /// Build and sign the authorization as of `now_ms` (unix milliseconds).
    pub async fn build_at(
        &self,
        swap: &CrossSwap,
        quote: &BridgeQuote,
        now_ms: u64,
    ) -> BridgeResult<SignedSponsoredQuote> {
        Self::validate(swap)?;

        let config = &self.ctx.config;
        let chains = &config.chains;
        let amount = quote.input_amount;
        let origin = swap.origin_chain_id();
        let destination = swap.destination_chain_id();

        let mode = quote
            .transfer_mode
            .unwrap_or_else(|| self.engine.select_mode(swap, amount));
        let fee = self.engine.cctp_fee(swap, mode, false).await?;
        let max_fee = calculate_cctp_fee(amount, &fee)?.fees_generated;
        let max_bps_to_sponsor = self.max_bps_to_sponsor(swap, amount, max_fee).await?;

        let handler_chain = chains.forwarded_via(destination).unwrap_or(destination);
        let handler = chains
            .periphery_address(handler_chain, PeripheryKind::SponsoredDstHandler)?
            .to_bytes32();

        let deadline = (now_ms / 1000)
            .checked_add(config.sponsorship.quote_validity_secs)
            .ok_or_else(|| BridgeError::invalid_param("quote deadline overflows"))?;

        let sponsored = SponsoredQuote {
            source_domain: chains.domain_id(origin)?,
            destination_domain: chains.domain_id(destination)?,
            mint_recipient: handler,
            amount,
            burn_token: swap.input_token.address.to_bytes32(),
            destination_caller: handler,
            max_fee,
            min_finality_threshold: mode.finality_threshold(),
            nonce: generate_nonce(now_ms, swap.depositor.to_bytes32()),
            deadline: U256::from(deadline),
            max_bps_to_sponsor,
            max_user_slippage_bps: U256::from(swap.slippage_tolerance_bps),
            final_recipient: swap.recipient.to_bytes32(),
            final_token: swap.output_token.address.to_bytes32(),
            execution_mode: ExecutionMode::Default,
            action_data: Bytes::new(),
        };

        let digest = sponsored.signing_digest();
        let signature = self
            .ctx
            .signer
            .sign_digest(digest)
            .await
            .map_err(BridgeError::SigningFailure)?;

        tracing::info!(
            nonce = %sponsored.nonce,
            %deadline,
            %max_fee,
            %max_bps_to_sponsor,
            signer = %self.ctx.signer.address(),
            "Sponsored quote signed"
        );

        Ok(SignedSponsoredQuote {
            quote: sponsored,
            signature,
        })
    }

    /// `ceil(maxFee * 10000 / amount)`, plus the conversion loss in bps when
    /// the final token has to be bought on the destination market.
    async fn max_bps_to_sponsor(&self, swap: &CrossSwap, amount: U256, max_fee: U256) -> BridgeResult<U256> {
        let fee_bps = max_fee_bps_ceil(max_fee, amount)?;
        if self.ctx.config.is_stable(&swap.output_token) {
            return Ok(fee_bps);
        }

        let bridged_token = self.engine.bridged_token(swap)?;
        let after_fee = amount
            .checked_sub(max_fee)
            .ok_or_else(|| BridgeError::invalid_param(format!("amount {amount} below fee {max_fee}")))?;
        let bridged = convert_decimals(after_fee, swap.input_token.decimals, bridged_token.decimals)?;
        let expected = convert_decimals(bridged, bridged_token.decimals, swap.output_token.decimals)?;
        let simulated = self.engine.simulate_final_leg(swap, bridged).await?;

        // gains add nothing
        if expected.is_zero() || simulated >= expected {
            return Ok(fee_bps);
        }
        let loss_bps = mul_div_ceil(expected - simulated, U256::from(BPS_DENOMINATOR), expected)?;
        tracing::debug!(%expected, %simulated, %loss_bps, "Final leg conversion loss");
        Ok(fee_bps + loss_bps)
    }
}
