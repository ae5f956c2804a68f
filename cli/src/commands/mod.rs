pub mod build_tx;
pub mod quote;
pub mod routes;

use std::{path::Path, sync::Arc};

use alloy::primitives::U256;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use bridge_quote_client::{
    api::{
        CctpFeeSchedule, HyperliquidInfoClient, IrisFeeClient, StaticFeeSchedule,
        SuggestedFeesClient,
    },
    config::EngineConfigFile,
    constants::{HYPERLIQUID_API_URL, IRIS_API_URL, SOLANA_RPC_URL, SUGGESTED_FEES_API_URL},
    BridgeClient, BridgeContext, BridgeProvider, BridgeQuote, CrossSwap, EngineConfig,
    IntegratorId, LocalQuoteSigner, SolanaRpcReader, SwapAmount,
};
use bridge_quote_core::{ChainAddress, ChainId, Token, TransferMode};

/// Loaded configuration plus a client wired to the live collaborators.
pub struct Environment {
    pub config: Arc<EngineConfig>,
    pub client: BridgeClient,
}

impl Environment {
    pub fn load(path: &Path, signer_key: Option<&str>) -> Result<Self> {
        let file = EngineConfigFile::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        let config = file.engine_config()?;
        let services = &file.services;

        let fee_schedule: Arc<dyn CctpFeeSchedule> = match &services.iris_url {
            None if !file.cctp_fees.is_empty() => {
                tracing::debug!(entries = file.cctp_fees.len(), "Using static fee schedule");
                Arc::new(StaticFeeSchedule::new(file.cctp_fees.clone()))
            }
            url => {
                let url = url.as_deref().unwrap_or(IRIS_API_URL);
                tracing::debug!(url, "Using Iris fee schedule");
                Arc::new(IrisFeeClient::new(url))
            }
        };

        let hyperliquid = Arc::new(HyperliquidInfoClient::new(
            services.hyperliquid_url.as_deref().unwrap_or(HYPERLIQUID_API_URL),
            file.markets.clone(),
        ));

        let signer = match signer_key {
            Some(key) => LocalQuoteSigner::from_hex(key)?,
            None => {
                tracing::warn!("No signer key configured, sponsored quotes use an ephemeral key");
                LocalQuoteSigner::random()
            }
        };

        let ctx = BridgeContext::builder()
            .config(config)
            .fee_schedule(fee_schedule)
            .accounts(hyperliquid.clone())
            .market(hyperliquid)
            .relay_fees(Arc::new(SuggestedFeesClient::new(
                services
                    .suggested_fees_url
                    .as_deref()
                    .unwrap_or(SUGGESTED_FEES_API_URL),
            )))
            .svm(Arc::new(SolanaRpcReader::new(
                services.solana_rpc_url.as_deref().unwrap_or(SOLANA_RPC_URL),
            )))
            .signer(Arc::new(signer))
            .build()?;

        let client = BridgeClient::new(ctx);
        Ok(Self {
            config: client.context().config.clone(),
            client,
        })
    }

    /// Quote with the forced provider, or the preferred eligible one.
    pub async fn quote(&self, args: &SwapArgs) -> Result<(CrossSwap, BridgeQuote)> {
        let swap = args.to_swap(&self.config)?;
        let quote = match args.provider {
            Some(provider) => self.client.strategy(provider.into())?.quote(&swap).await?,
            None => self.client.quote(&swap).await?,
        };
        Ok((swap, quote))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Fast,
    Standard,
}

impl From<ModeArg> for TransferMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fast => TransferMode::Fast,
            ModeArg::Standard => TransferMode::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    NativeIntent,
    Cctp,
    CctpSponsored,
}

impl From<ProviderArg> for BridgeProvider {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::NativeIntent => BridgeProvider::NativeIntent,
            ProviderArg::Cctp => BridgeProvider::Cctp,
            ProviderArg::CctpSponsored => BridgeProvider::CctpSponsored,
        }
    }
}

/// Route selection shared by every subcommand.
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Origin chain id
    #[arg(long)]
    pub origin_chain: ChainId,

    /// Input token symbol or address
    #[arg(long)]
    pub input_token: String,

    /// Destination chain id
    #[arg(long)]
    pub destination_chain: ChainId,

    /// Output token symbol or address
    #[arg(long)]
    pub output_token: String,
}

impl RouteArgs {
    pub fn tokens(&self, config: &EngineConfig) -> Result<(Token, Token)> {
        Ok((
            resolve_token(config, self.origin_chain, &self.input_token)?,
            resolve_token(config, self.destination_chain, &self.output_token)?,
        ))
    }
}

#[derive(Args, Debug)]
pub struct SwapArgs {
    #[command(flatten)]
    pub route: RouteArgs,

    /// Depositor address on the origin chain
    #[arg(long)]
    pub depositor: String,

    /// Recipient on the destination chain (defaults to the depositor)
    #[arg(long)]
    pub recipient: Option<String>,

    /// Amount in the token's smallest unit
    #[arg(long)]
    pub amount: U256,

    /// Treat --amount as the minimum output instead of the exact input
    #[arg(long)]
    pub min_output: bool,

    #[arg(long, default_value_t = 0)]
    pub slippage_bps: u32,

    /// Two-byte integrator id, e.g. 0xabcd
    #[arg(long)]
    pub integrator_id: Option<IntegratorId>,

    #[arg(long, value_enum)]
    pub transfer_mode: Option<ModeArg>,

    /// Origin account refunded if the deposit expires
    #[arg(long)]
    pub refund_address: Option<String>,

    /// Force a bridge instead of the preferred eligible one
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,
}

impl SwapArgs {
    pub fn to_swap(&self, config: &EngineConfig) -> Result<CrossSwap> {
        let (input_token, output_token) = self.route.tokens(config)?;
        let origin = config.chains.ecosystem(self.route.origin_chain)?;
        let destination = config.chains.ecosystem(self.route.destination_chain)?;

        let depositor = ChainAddress::parse_for(origin, &self.depositor).context("Invalid depositor")?;
        let recipient = match &self.recipient {
            Some(recipient) => {
                ChainAddress::parse_for(destination, recipient).context("Invalid recipient")?
            }
            None => depositor,
        };
        let amount = if self.min_output {
            SwapAmount::MinOutput(self.amount)
        } else {
            SwapAmount::ExactInput(self.amount)
        };

        let mut swap = CrossSwap::new(input_token, output_token, depositor, recipient, amount)
            .with_slippage_bps(self.slippage_bps);
        if let Some(id) = self.integrator_id {
            swap = swap.with_integrator_id(id);
        }
        if let Some(mode) = self.transfer_mode {
            swap = swap.with_transfer_mode(mode.into());
        }
        if let Some(refund) = &self.refund_address {
            swap = swap.with_refund_address(
                ChainAddress::parse_for(origin, refund).context("Invalid refund address")?,
            );
        }
        Ok(swap)
    }
}

fn resolve_token(config: &EngineConfig, chain_id: ChainId, value: &str) -> Result<Token> {
    let token = match ChainAddress::parse(value) {
        Ok(address) => config.tokens.by_address(chain_id, &address),
        Err(_) => config.tokens.by_symbol(chain_id, value),
    };
    token
        .cloned()
        .with_context(|| format!("Unknown token '{value}' on chain {chain_id}"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
