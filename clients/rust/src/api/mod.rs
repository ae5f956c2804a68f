//! Collaborator traits consumed by the engine.
//!
//! Every suspension point of a quote pipeline is a call through one of these
//! traits. Production implementations live in the submodules; tests inject
//! deterministic stubs.

pub mod hyperliquid;
pub mod iris;
pub mod static_fees;
pub mod suggested_fees;

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use bridge_quote_core::{CctpFee, ChainAddress, ChainId, Token};
use solana_sdk::hash::Hash;

use crate::errors::BridgeError;

pub use hyperliquid::HyperliquidInfoClient;
pub use iris::IrisFeeClient;
pub use static_fees::StaticFeeSchedule;
pub use suggested_fees::SuggestedFeesClient;

/// CCTP fee schedule keyed by route and finality.
#[async_trait]
pub trait CctpFeeSchedule: Send + Sync {
    /// Fee entry for `(source_domain, destination_domain, finality_threshold)`.
    ///
    /// A missing entry is reported as [`BridgeError::UpstreamConfigNotFound`].
    async fn fee_entry(
        &self,
        source_domain: u32,
        destination_domain: u32,
        finality_threshold: u32,
    ) -> Result<CctpFee, BridgeError>;
}

/// Account-existence lookup for chains that charge for account activation.
#[async_trait]
pub trait AccountActivationLookup: Send + Sync {
    async fn account_exists(
        &self,
        chain_id: ChainId,
        account: &ChainAddress,
    ) -> Result<bool, BridgeError>;
}

/// Market-order simulation against a destination order book.
#[async_trait]
pub trait MarketSimulator: Send + Sync {
    /// Amount of `token_out` (native units) received for selling `amount_in`
    /// of `token_in` at market.
    async fn simulate_market_order(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: U256,
    ) -> Result<U256, BridgeError>;
}

/// Relay fee quote for an intent deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayFeeQuote {
    /// Total relayer fee, `1e18` = 100%
    pub total_relay_fee_pct: U256,
    pub min_deposit: U256,
    pub max_deposit: U256,
    pub quote_timestamp: u32,
    pub fill_deadline: u32,
    pub exclusive_relayer: Address,
    pub exclusivity_deadline: u32,
    pub estimated_fill_time_sec: u64,
}

#[async_trait]
pub trait RelayFeeOracle: Send + Sync {
    async fn relay_fees(
        &self,
        input_token: &Token,
        output_token: &Token,
        amount: U256,
        recipient: &ChainAddress,
    ) -> Result<RelayFeeQuote, BridgeError>;
}

/// Read access to an SVM chain.
#[async_trait]
pub trait SvmChainReader: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash, BridgeError>;
}

/// Signing capability for sponsored quotes. Key material never leaves it.
#[async_trait]
pub trait QuoteSigner: Send + Sync {
    /// Address the verifying contract expects to recover.
    fn address(&self) -> Address;

    /// Sign a 32-byte digest, returning the raw signature bytes.
    async fn sign_digest(&self, digest: B256) -> anyhow::Result<Bytes>;
}
