//! Configuration types for the quote engine.
//!
//! [`EngineConfig`] is built once (in code through [`EngineConfigBuilder`] or
//! from YAML through [`EngineConfigFile`]) and shared read-only by every
//! component behind an `Arc`.

use std::path::Path;

use alloy::primitives::U256;
use bridge_quote_core::{ChainDomainRegistry, ChainInfo, CctpFee, Token, TokenRegistry};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::constants::{
    CCTP_MESSAGE_TRANSMITTER_PROGRAM_ID, CCTP_TOKEN_MESSENGER_MINTER_PROGRAM_ID,
    DEFAULT_ACCOUNT_CREATION_FEE, DEFAULT_QUOTE_VALIDITY_SECS, DEFAULT_STABLE_SYMBOL,
};

/// Search budget for the iterative min-output heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    /// Buffer applied to the seed input before the indicative quote
    pub seed_buffer_bps: u32,
    pub rounds: u32,
    pub candidates_per_round: u32,
    /// Extra buffer added for every successive candidate
    pub step_bps: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed_buffer_bps: 50,
            rounds: 3,
            candidates_per_round: 3,
            step_bps: 10,
        }
    }
}

impl SolverConfig {
    pub fn max_attempts(&self) -> u32 {
        self.rounds.saturating_mul(self.candidates_per_round)
    }
}

/// Sponsored CCTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SponsorshipConfig {
    /// Seconds a signed quote stays valid
    pub quote_validity_secs: u64,
    /// Non-stable destination tokens the sponsored flow may deliver (by symbol)
    pub final_tokens: Vec<String>,
}

impl Default for SponsorshipConfig {
    fn default() -> Self {
        Self {
            quote_validity_secs: DEFAULT_QUOTE_VALIDITY_SECS,
            final_tokens: Vec::new(),
        }
    }
}

impl SponsorshipConfig {
    pub fn allows_final_token(&self, symbol: &str) -> bool {
        self.final_tokens
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

/// CCTP program ids on the SVM origin.
#[derive(Debug, Clone, Copy)]
pub struct SvmProgramsConfig {
    pub message_transmitter: Pubkey,
    pub token_messenger_minter: Pubkey,
}

impl Default for SvmProgramsConfig {
    fn default() -> Self {
        Self {
            message_transmitter: CCTP_MESSAGE_TRANSMITTER_PROGRAM_ID,
            token_messenger_minter: CCTP_TOKEN_MESSENGER_MINTER_PROGRAM_ID,
        }
    }
}

/// Main configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub chains: ChainDomainRegistry,
    pub tokens: TokenRegistry,
    /// Symbol of the stable reference asset CCTP moves
    pub stable_symbol: String,
    /// Fee for activating a new account, in bridged-token units
    pub account_creation_fee: U256,
    pub solver: SolverConfig,
    pub sponsorship: SponsorshipConfig,
    pub svm_programs: SvmProgramsConfig,
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    pub fn is_stable(&self, token: &Token) -> bool {
        token.is_symbol(&self.stable_symbol)
    }
}

/// Builder for EngineConfig.
#[derive(Default)]
pub struct EngineConfigBuilder {
    chains: Option<Vec<ChainInfo>>,
    tokens: Option<Vec<Token>>,
    stable_symbol: Option<String>,
    account_creation_fee: Option<U256>,
    solver: Option<SolverConfig>,
    sponsorship: Option<SponsorshipConfig>,
    svm_programs: Option<SvmProgramsConfig>,
}

impl EngineConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chains(mut self, chains: impl IntoIterator<Item = ChainInfo>) -> Self {
        self.chains = Some(chains.into_iter().collect());
        self
    }

    pub fn tokens(mut self, tokens: impl IntoIterator<Item = Token>) -> Self {
        self.tokens = Some(tokens.into_iter().collect());
        self
    }

    pub fn stable_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.stable_symbol = Some(symbol.into());
        self
    }

    pub fn account_creation_fee(mut self, fee: U256) -> Self {
        self.account_creation_fee = Some(fee);
        self
    }

    pub fn solver(mut self, config: SolverConfig) -> Self {
        self.solver = Some(config);
        self
    }

    pub fn sponsorship(mut self, config: SponsorshipConfig) -> Self {
        self.sponsorship = Some(config);
        self
    }

    pub fn svm_programs(mut self, config: SvmProgramsConfig) -> Self {
        self.svm_programs = Some(config);
        self
    }

    /// Build the configuration.
    ///
    /// Returns an error if required fields are missing or a setting would
    /// make quotes impossible to produce.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let chains = self.chains.ok_or(ConfigError::MissingField("chains"))?;
        let tokens = self.tokens.ok_or(ConfigError::MissingField("tokens"))?;

        let solver = self.solver.unwrap_or_default();
        if solver.max_attempts() == 0 {
            return Err(ConfigError::Invalid(
                "solver needs at least one round and one candidate".to_string(),
            ));
        }
        let sponsorship = self.sponsorship.unwrap_or_default();
        if sponsorship.quote_validity_secs == 0 {
            return Err(ConfigError::Invalid(
                "quote_validity_secs must be positive".to_string(),
            ));
        }

        Ok(EngineConfig {
            chains: ChainDomainRegistry::new(chains),
            tokens: TokenRegistry::new(tokens),
            stable_symbol: self
                .stable_symbol
                .unwrap_or_else(|| DEFAULT_STABLE_SYMBOL.to_string()),
            account_creation_fee: self
                .account_creation_fee
                .unwrap_or(U256::from(DEFAULT_ACCOUNT_CREATION_FEE)),
            solver,
            sponsorship,
            svm_programs: self.svm_programs.unwrap_or_default(),
        })
    }
}

/// One row of a static CCTP fee table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticFeeEntry {
    pub source_domain: u32,
    pub destination_domain: u32,
    pub finality_threshold: u32,
    #[serde(flatten)]
    pub fee: CctpFee,
}

/// Base URLs of the collaborator services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceEndpoints {
    pub solana_rpc_url: Option<String>,
    /// Circle attestation service; the static fee table is used when absent
    pub iris_url: Option<String>,
    pub hyperliquid_url: Option<String>,
    pub suggested_fees_url: Option<String>,
}

/// Spot market used to price a HyperCore token against the stable asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEntry {
    /// Token symbol this market prices
    pub symbol: String,
    /// HyperCore coin name, e.g. `@166`
    pub coin: String,
}

/// On-disk configuration (YAML).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfigFile {
    pub chains: Vec<ChainInfo>,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub stable_symbol: Option<String>,
    #[serde(default)]
    pub account_creation_fee: Option<U256>,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub sponsorship: SponsorshipConfig,
    #[serde(default)]
    pub cctp_fees: Vec<StaticFeeEntry>,
    #[serde(default)]
    pub markets: Vec<MarketEntry>,
    #[serde(default)]
    pub services: ServiceEndpoints,
}

impl EngineConfigFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Build the engine configuration described by this file.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let mut builder = EngineConfigBuilder::new()
            .chains(self.chains.clone())
            .tokens(self.tokens.clone())
            .solver(self.solver.clone())
            .sponsorship(self.sponsorship.clone());
        if let Some(symbol) = &self.stable_symbol {
            builder = builder.stable_symbol(symbol.clone());
        }
        if let Some(fee) = self.account_creation_fee {
            builder = builder.account_creation_fee(fee);
        }
        builder.build()
    }
}

/// Error type for configuration issues.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_quote_core::{chains::ARBITRUM_CHAIN_ID, PeripheryKind};

    #[test]
    fn test_default_configs() {
        let solver = SolverConfig::default();
        assert_eq!(solver.seed_buffer_bps, 50);
        assert_eq!(solver.max_attempts(), 9);

        let sponsorship = SponsorshipConfig::default();
        assert_eq!(sponsorship.quote_validity_secs, 300);
    }

    #[test]
    fn test_builder_missing_fields() {
        let result = EngineConfigBuilder::new().build();
        assert!(matches!(result, Err(ConfigError::MissingField("chains"))));

        let result = EngineConfigBuilder::new().chains([]).build();
        assert!(matches!(result, Err(ConfigError::MissingField("tokens"))));
    }

    #[test]
    fn test_builder_rejects_empty_solver() {
        let result = EngineConfigBuilder::new()
            .chains([])
            .tokens([])
            .solver(SolverConfig {
                rounds: 0,
                ..Default::default()
            })
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_yaml_file() {
        let yaml = r#"
chains:
  - chainId: 42161
    name: arbitrum
    ecosystem: evm
    cctpDomain: 3
    fastTransferLimit: 10000
    peripheries:
      tokenMessenger: "0x28b5a0e9C621a5BadaA536219b3a228C8168cf5d"
tokens:
  - chainId: 42161
    address: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831"
    symbol: USDC
    decimals: 6
sponsorship:
  finalTokens: [USDT0]
cctpFees:
  - sourceDomain: 3
    destinationDomain: 19
    finalityThreshold: 1000
    transferFeeBps: 1
    forwardFee: "0x0"
"#;
        let file = EngineConfigFile::from_yaml_str(yaml).unwrap();
        assert_eq!(file.cctp_fees.len(), 1);
        assert_eq!(file.cctp_fees[0].fee.transfer_fee_bps, 1);

        let config = file.engine_config().unwrap();
        assert_eq!(config.stable_symbol, "USDC");
        assert_eq!(config.chains.domain_id(ARBITRUM_CHAIN_ID).unwrap(), 3);
        assert!(config
            .chains
            .has_periphery(ARBITRUM_CHAIN_ID, PeripheryKind::TokenMessenger));
        assert!(config.sponsorship.allows_final_token("usdt0"));
        assert_eq!(config.solver.rounds, 3);
    }
}
