//! Forward and inverse amount solving for every bridge flow.

pub mod solver;

use std::sync::Arc;

use alloy::primitives::U256;
use bridge_quote_core::{
    calculate_cctp_fee, convert_decimals, convert_decimals_ceil, fee_pct,
    fees::{deduct_bps, mul_div, mul_div_ceil},
    invert_linear_fee, CctpFee, FeeResult, Token, TransferMode, PCT_SCALE,
};

use crate::{
    api::RelayFeeQuote,
    client::BridgeContext,
    errors::{BridgeError, BridgeResult},
    fees::{CctpRoute, FeeModel},
    types::{BridgeProvider, BridgeQuote, CrossSwap, IntentParams, QuoteFees},
};

pub use solver::{solve_min_output, SolverOutput};

/// Fee breakdown of one CCTP burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CctpLeg {
    pub mode: TransferMode,
    pub fee: CctpFee,
    pub fees: FeeResult,
    /// Account creation fee charged on the destination, zero if none.
    pub activation_fee: U256,
    pub output_amount: U256,
}

impl CctpLeg {
    /// Everything deducted from the input, in input units.
    pub fn total_fee(&self) -> U256 {
        self.fees.fees_generated.saturating_add(self.activation_fee)
    }
}

#[derive(Clone)]
pub struct QuoteEngine {
    ctx: Arc<BridgeContext>,
    fee_model: FeeModel,
}

impl QuoteEngine {
    pub fn new(ctx: Arc<BridgeContext>) -> Self {
        let fee_model = FeeModel::new(ctx.config.clone(), ctx.fee_schedule.clone());
        Self { ctx, fee_model }
    }

    pub fn fee_model(&self) -> &FeeModel {
        &self.fee_model
    }

    pub fn select_mode(&self, swap: &CrossSwap, amount: U256) -> TransferMode {
        self.fee_model.select_transfer_mode(
            swap.origin_chain_id(),
            swap.transfer_mode,
            amount,
            swap.input_token.decimals,
        )
    }

    pub async fn cctp_fee(
        &self,
        swap: &CrossSwap,
        mode: TransferMode,
        use_forward_fee: bool,
    ) -> BridgeResult<CctpFee> {
        self.fee_model
            .compute_cctp_fee(route_of(swap), mode, use_forward_fee)
            .await
    }

    /// Whether the recipient still has to pay for account creation.
    pub async fn activation_required(&self, swap: &CrossSwap) -> BridgeResult<bool> {
        let destination = swap.destination_chain_id();
        if !self.ctx.config.chains.requires_account_activation(destination) {
            return Ok(false);
        }
        let exists = self
            .ctx
            .accounts
            .account_exists(destination, &swap.recipient)
            .await?;
        Ok(!exists)
    }

    async fn cctp_inputs(
        &self,
        swap: &CrossSwap,
        mode: TransferMode,
        use_forward_fee: bool,
    ) -> BridgeResult<(CctpFee, bool)> {
        tokio::try_join!(
            self.cctp_fee(swap, mode, use_forward_fee),
            self.activation_required(swap)
        )
    }

    fn apply_cctp(
        &self,
        swap: &CrossSwap,
        amount: U256,
        mode: TransferMode,
        fee: CctpFee,
        activation: bool,
    ) -> BridgeResult<CctpLeg> {
        let fees = calculate_cctp_fee(amount, &fee)?;
        let activation_fee = if activation {
            self.ctx.config.account_creation_fee
        } else {
            U256::ZERO
        };
        let remaining = fees
            .amount_after_fees
            .checked_sub(activation_fee)
            .ok_or_else(|| {
                BridgeError::invalid_param(format!(
                    "amount {amount} does not cover the account creation fee {activation_fee}"
                ))
            })?;
        let output_amount = convert_decimals(
            remaining,
            swap.input_token.decimals,
            swap.output_token.decimals,
        )?;

        Ok(CctpLeg {
            mode,
            fee,
            fees,
            activation_fee,
            output_amount,
        })
    }

    /// Exact input: burn `amount` and report what arrives.
    pub async fn cctp_exact_input(
        &self,
        swap: &CrossSwap,
        amount: U256,
        use_forward_fee: bool,
    ) -> BridgeResult<CctpLeg> {
        ensure_positive(amount)?;
        let mode = self.select_mode(swap, amount);
        let (fee, activation) = self.cctp_inputs(swap, mode, use_forward_fee).await?;
        self.apply_cctp(swap, amount, mode, fee, activation)
    }

    /// Min output: the smallest burn delivering `target`, verified forward.
    pub async fn cctp_min_output(
        &self,
        swap: &CrossSwap,
        target: U256,
        use_forward_fee: bool,
    ) -> BridgeResult<(U256, CctpLeg)> {
        ensure_positive(target)?;
        let target_in = convert_decimals_ceil(
            target,
            swap.output_token.decimals,
            swap.input_token.decimals,
        )?;
        let mut mode = self.select_mode(swap, target_in);
        let (mut fee, activation) = self.cctp_inputs(swap, mode, use_forward_fee).await?;

        let gross = if activation {
            target_in
                .checked_add(self.ctx.config.account_creation_fee)
                .ok_or_else(|| BridgeError::invalid_param("target amount overflows"))?
        } else {
            target_in
        };
        let mut input = invert_linear_fee(gross, &fee)?;

        // fees can push the solved input over the fast limit
        let solved_mode = self.select_mode(swap, input);
        if solved_mode != mode {
            tracing::debug!(%input, ?mode, ?solved_mode, "Inverse crossed the fast limit");
            mode = solved_mode;
            fee = self.cctp_fee(swap, mode, use_forward_fee).await?;
            input = invert_linear_fee(gross, &fee)?;

            // the cheaper standard fee can land back under the limit
            if self.select_mode(swap, input) != mode {
                if let Some(limit) = self
                    .fee_model
                    .fast_limit_units(swap.origin_chain_id(), swap.input_token.decimals)
                {
                    input = limit.saturating_add(U256::from(1u8));
                }
            }
        }
        let leg = self.apply_cctp(swap, input, mode, fee, activation)?;

        if leg.output_amount < target {
            return Err(BridgeError::QuoteConvergenceFailure {
                target: target.to_string(),
                attempts: 1,
            });
        }
        Ok((input, leg))
    }

    pub fn cctp_quote(&self, swap: &CrossSwap, input: U256, leg: &CctpLeg) -> BridgeResult<BridgeQuote> {
        let fee_amount = leg.total_fee();
        let quote = BridgeQuote {
            provider: BridgeProvider::Cctp,
            input_token: swap.input_token.clone(),
            output_token: swap.output_token.clone(),
            input_amount: input,
            output_amount: leg.output_amount,
            min_output_amount: leg.output_amount,
            estimated_fill_time_sec: self
                .ctx
                .config
                .chains
                .fill_time_secs(swap.origin_chain_id(), leg.mode),
            fees: quote_fees(&swap.input_token, fee_amount, input)?,
            transfer_mode: Some(leg.mode),
            cctp_max_fee: Some(leg.fees.fees_generated),
            intent: None,
        };
        log_quote(&quote);
        Ok(quote)
    }

    /// Intent exact input: one oracle call, relay fee taken off the top.
    pub async fn intent_exact_input(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<BridgeQuote> {
        ensure_positive(amount)?;
        let relay = self.relay_fees(swap, amount).await?;
        self.intent_quote(swap, amount, &relay)
    }

    /// Intent min output: analytic inverse on the oracle's fee rate.
    pub async fn intent_min_output(&self, swap: &CrossSwap, target: U256) -> BridgeResult<BridgeQuote> {
        ensure_positive(target)?;
        let target_in = convert_decimals_ceil(
            target,
            swap.output_token.decimals,
            swap.input_token.decimals,
        )?;
        let relay = self.relay_fees(swap, target_in).await?;
        if relay.total_relay_fee_pct >= PCT_SCALE {
            return Err(BridgeError::invalid_param(format!(
                "relay fee pct {} leaves nothing to bridge",
                relay.total_relay_fee_pct
            )));
        }
        let input = mul_div_ceil(target_in, PCT_SCALE, PCT_SCALE - relay.total_relay_fee_pct)?;

        let quote = self.intent_quote(swap, input, &relay)?;
        if quote.output_amount < target {
            return Err(BridgeError::QuoteConvergenceFailure {
                target: target.to_string(),
                attempts: 1,
            });
        }
        Ok(quote)
    }

    async fn relay_fees(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<RelayFeeQuote> {
        self.ctx
            .relay_fees
            .relay_fees(&swap.input_token, &swap.output_token, amount, &swap.recipient)
            .await
    }

    fn intent_quote(
        &self,
        swap: &CrossSwap,
        input: U256,
        relay: &RelayFeeQuote,
    ) -> BridgeResult<BridgeQuote> {
        if input < relay.min_deposit || input > relay.max_deposit {
            return Err(BridgeError::invalid_param(format!(
                "amount {input} outside deposit limits [{}, {}]",
                relay.min_deposit, relay.max_deposit
            )));
        }

        let fee_amount = mul_div(input, relay.total_relay_fee_pct, PCT_SCALE)?;
        let remaining = input.checked_sub(fee_amount).ok_or_else(|| {
            BridgeError::invalid_param(format!("amount {input} below relay fee {fee_amount}"))
        })?;
        let output_amount = convert_decimals(
            remaining,
            swap.input_token.decimals,
            swap.output_token.decimals,
        )?;

        let quote = BridgeQuote {
            provider: BridgeProvider::NativeIntent,
            input_token: swap.input_token.clone(),
            output_token: swap.output_token.clone(),
            input_amount: input,
            output_amount,
            min_output_amount: output_amount,
            estimated_fill_time_sec: relay.estimated_fill_time_sec,
            fees: QuoteFees {
                amount: fee_amount,
                pct: relay.total_relay_fee_pct,
                token: swap.input_token.clone(),
            },
            transfer_mode: None,
            cctp_max_fee: None,
            intent: Some(IntentParams {
                quote_timestamp: relay.quote_timestamp,
                fill_deadline: relay.fill_deadline,
                exclusive_relayer: relay.exclusive_relayer.into_word(),
                exclusivity_deadline: relay.exclusivity_deadline,
            }),
        };
        log_quote(&quote);
        Ok(quote)
    }

    /// Stable token the bridged amount lands as on the destination.
    pub fn bridged_token<'a>(&'a self, swap: &CrossSwap) -> BridgeResult<&'a Token> {
        let config = &self.ctx.config;
        Ok(config
            .tokens
            .by_symbol(swap.destination_chain_id(), &config.stable_symbol)?)
    }

    /// Market simulation for `amount` of the bridged token into the output token.
    pub async fn simulate_final_leg(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<U256> {
        self.ctx
            .market
            .simulate_market_order(self.bridged_token(swap)?, &swap.output_token, amount)
            .await
    }

    /// Sponsored exact input. Bridge fees are carried by the sponsor.
    pub async fn sponsored_exact_input(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<BridgeQuote> {
        ensure_positive(amount)?;
        let mode = self.select_mode(swap, amount);

        let (output_amount, min_output_amount) = if self.ctx.config.is_stable(&swap.output_token) {
            let output = convert_decimals(
                amount,
                swap.input_token.decimals,
                swap.output_token.decimals,
            )?;
            (output, output)
        } else {
            let bridged = convert_decimals(
                amount,
                swap.input_token.decimals,
                self.bridged_token(swap)?.decimals,
            )?;
            let output = self.simulate_final_leg(swap, bridged).await?;
            (output, deduct_bps(output, swap.slippage_tolerance_bps)?)
        };

        let quote = BridgeQuote {
            provider: BridgeProvider::CctpSponsored,
            input_token: swap.input_token.clone(),
            output_token: swap.output_token.clone(),
            input_amount: amount,
            output_amount,
            min_output_amount,
            estimated_fill_time_sec: self
                .ctx
                .config
                .chains
                .fill_time_secs(swap.origin_chain_id(), mode),
            fees: quote_fees(&swap.input_token, U256::ZERO, amount)?,
            transfer_mode: Some(mode),
            cctp_max_fee: None,
            intent: None,
        };
        log_quote(&quote);
        Ok(quote)
    }

    /// Sponsored min output. Stable outputs invert exactly; anything priced
    /// by the market goes through the bounded search.
    pub async fn sponsored_min_output(&self, swap: &CrossSwap, target: U256) -> BridgeResult<BridgeQuote> {
        ensure_positive(target)?;
        if self.ctx.config.is_stable(&swap.output_token) {
            let input = convert_decimals_ceil(
                target,
                swap.output_token.decimals,
                swap.input_token.decimals,
            )?;
            return self.sponsored_exact_input(swap, input).await;
        }

        let bridged = self.bridged_token(swap)?;
        let seed = convert_decimals_ceil(target, swap.output_token.decimals, bridged.decimals)?;
        let seed = convert_decimals_ceil(seed, bridged.decimals, swap.input_token.decimals)?;
        solve_min_output(&self.ctx.config.solver, target, seed, |candidate| {
            self.sponsored_exact_input(swap, candidate)
        })
        .await
    }
}

fn route_of(swap: &CrossSwap) -> CctpRoute {
    CctpRoute {
        origin_chain_id: swap.origin_chain_id(),
        destination_chain_id: swap.destination_chain_id(),
    }
}

fn ensure_positive(amount: U256) -> BridgeResult<()> {
    if amount.is_zero() {
        return Err(BridgeError::invalid_param("amount must be greater than zero"));
    }
    Ok(())
}

fn quote_fees(token: &Token, amount: U256, input: U256) -> BridgeResult<QuoteFees> {
    Ok(QuoteFees {
        amount,
        pct: fee_pct(amount, input)?,
        token: token.clone(),
    })
}

fn log_quote(quote: &BridgeQuote) {
    tracing::debug!(
        provider = %quote.provider,
        input_amount = %quote.input_amount,
        output_amount = %quote.output_amount,
        fee = %quote.fees.amount,
        "Quote computed"
    );
}
