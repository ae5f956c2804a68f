//! Bridge Quote Client
//!
//! Quotes cross-chain transfers and builds the unsigned deposit transaction
//! for the user's wallet.
//!
//! # Features
//!
//! - **Strategies**: intent deposits, plain CCTP v2 and sponsored CCTP behind one enum
//! - **Quoting**: exact-input and min-output solving, with a bounded search for market-priced legs
//! - **Sponsorship**: signed authorizations for fee-sponsored CCTP transfers
//! - **Assembly**: ABI calldata for EVM origins, partially signed transactions for SVM origins
//! - **Collaborators**: Circle Iris, Hyperliquid info, suggested-fees and Solana RPC clients
//!
//! # Example
//!
//! ```ignore
//! use bridge_quote_client::{BridgeClient, BridgeContext, CrossSwap, SwapAmount};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BridgeClient::new(context);
//!     let swap = CrossSwap::new(usdc_arbitrum, usdc_hypercore, depositor, recipient,
//!         SwapAmount::ExactInput(U256::from(1_000_000u64)));
//!
//!     let quote = client.quote(&swap).await?;
//!     let tx = client.build_transaction(&swap, &quote).await?;
//!     println!("{}", serde_json::to_string_pretty(&tx)?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod assembler;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fees;
pub mod instructions;
pub mod quote;
pub mod rpc;
pub mod signer;
pub mod sponsorship;
pub mod strategy;
pub mod types;

pub use api::{
    AccountActivationLookup, CctpFeeSchedule, MarketSimulator, QuoteSigner, RelayFeeOracle,
    RelayFeeQuote, SvmChainReader,
};
pub use assembler::{DepositPlan, TransactionAssembler};
pub use client::{BridgeClient, BridgeContext, BridgeContextBuilder};
pub use config::{
    ConfigError, EngineConfig, EngineConfigBuilder, EngineConfigFile, SolverConfig,
    SponsorshipConfig, SvmProgramsConfig,
};
pub use errors::{BridgeError, BridgeResult, ErrorCategory};
pub use fees::{CctpRoute, FeeModel};
pub use quote::{CctpLeg, QuoteEngine};
pub use rpc::SolanaRpcReader;
pub use signer::LocalQuoteSigner;
pub use sponsorship::SponsorshipQuoteBuilder;
pub use strategy::BridgeStrategy;
pub use types::{
    AppFee, BridgeProvider, BridgeQuote, CrossSwap, IntegratorId, IntentParams, QuoteFees, Route,
    SignedSponsoredQuote, SwapAmount, SwapLeg, UnsignedTransaction,
};

pub use bridge_quote_core as core;
