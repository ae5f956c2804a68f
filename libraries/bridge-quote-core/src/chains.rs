//! Chain → bridge-protocol registry.
//!
//! Static mapping from chain identifier to CCTP domain, finality thresholds,
//! periphery contracts and ecosystem. Lookups never perform I/O; a missing
//! entry is reported as [`CoreError::ConfigNotFound`].

use std::collections::{BTreeMap, HashMap};

use crate::{
    address::{ChainAddress, Ecosystem},
    error::{CoreError, CoreResult},
};

pub type ChainId = u64;

pub const ETHEREUM_CHAIN_ID: ChainId = 1;
pub const OPTIMISM_CHAIN_ID: ChainId = 10;
pub const UNICHAIN_CHAIN_ID: ChainId = 130;
pub const POLYGON_CHAIN_ID: ChainId = 137;
pub const WORLD_CHAIN_CHAIN_ID: ChainId = 480;
pub const HYPEREVM_CHAIN_ID: ChainId = 999;
/// HyperCore is not an EVM chain; this is the identifier used for it across the bridge.
pub const HYPERCORE_CHAIN_ID: ChainId = 1337;
pub const BASE_CHAIN_ID: ChainId = 8453;
pub const ARBITRUM_CHAIN_ID: ChainId = 42161;
pub const AVALANCHE_CHAIN_ID: ChainId = 43114;
pub const LINEA_CHAIN_ID: ChainId = 59144;
pub const SOLANA_CHAIN_ID: ChainId = 34268394551451;

/// Minimum finality threshold for CCTP v2 fast transfers.
pub const FAST_FINALITY_THRESHOLD: u32 = 1000;
/// Minimum finality threshold for CCTP v2 standard transfers.
pub const STANDARD_FINALITY_THRESHOLD: u32 = 2000;

const DEFAULT_FAST_FILL_SECS: u64 = 20;
const DEFAULT_STANDARD_FILL_SECS: u64 = 19 * 60;

/// CCTP transfer speed.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferMode {
    Fast,
    Standard,
}

impl TransferMode {
    pub fn finality_threshold(&self) -> u32 {
        match self {
            TransferMode::Fast => FAST_FINALITY_THRESHOLD,
            TransferMode::Standard => STANDARD_FINALITY_THRESHOLD,
        }
    }
}

/// On-chain contracts (or programs) a chain may expose to the bridge.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeripheryKind {
    /// Intent bridge deposit contract.
    SpokePool,
    /// CCTP v2 `TokenMessenger`.
    TokenMessenger,
    /// Sponsored CCTP source periphery (origin side).
    SponsoredSrcPeriphery,
    /// Handler receiving sponsored mints on the forwarding chain.
    SponsoredDstHandler,
    /// Forwarder relaying plain CCTP mints to a non-addressable destination.
    CctpForwarder,
}

/// Static description of one chain.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    pub chain_id: ChainId,
    pub name: String,
    pub ecosystem: Ecosystem,
    /// CCTP domain id, when the chain is directly addressable by CCTP.
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub cctp_domain: Option<u32>,
    /// Chain through which transfers to this chain are relayed.
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub forwarded_via: Option<ChainId>,
    /// Recipient accounts must be activated (for a fee) before first use.
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub requires_account_activation: bool,
    /// Largest amount (whole tokens) eligible for fast transfers. `None` = no fast mode.
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub fast_transfer_limit: Option<u64>,
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub fast_fill_secs: Option<u64>,
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub standard_fill_secs: Option<u64>,
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub peripheries: HashMap<PeripheryKind, ChainAddress>,
}

impl ChainInfo {
    pub fn new(chain_id: ChainId, name: impl Into<String>, ecosystem: Ecosystem) -> Self {
        Self {
            chain_id,
            name: name.into(),
            ecosystem,
            cctp_domain: None,
            forwarded_via: None,
            requires_account_activation: false,
            fast_transfer_limit: None,
            fast_fill_secs: None,
            standard_fill_secs: None,
            peripheries: HashMap::new(),
        }
    }

    pub fn evm(chain_id: ChainId, name: impl Into<String>) -> Self {
        Self::new(chain_id, name, Ecosystem::Evm)
    }

    pub fn svm(chain_id: ChainId, name: impl Into<String>) -> Self {
        Self::new(chain_id, name, Ecosystem::Svm)
    }

    pub fn with_domain(mut self, domain: u32) -> Self {
        self.cctp_domain = Some(domain);
        self
    }

    pub fn with_forwarding(mut self, via: ChainId) -> Self {
        self.forwarded_via = Some(via);
        self
    }

    pub fn with_account_activation(mut self) -> Self {
        self.requires_account_activation = true;
        self
    }

    pub fn with_fast_limit(mut self, whole_tokens: u64) -> Self {
        self.fast_transfer_limit = Some(whole_tokens);
        self
    }

    pub fn with_fill_times(mut self, fast_secs: u64, standard_secs: u64) -> Self {
        self.fast_fill_secs = Some(fast_secs);
        self.standard_fill_secs = Some(standard_secs);
        self
    }

    pub fn with_periphery(mut self, kind: PeripheryKind, address: impl Into<ChainAddress>) -> Self {
        self.peripheries.insert(kind, address.into());
        self
    }
}

/// Immutable lookup table of every chain the engine knows about.
#[derive(Debug, Clone, Default)]
pub struct ChainDomainRegistry {
    chains: BTreeMap<ChainId, ChainInfo>,
}

impl ChainDomainRegistry {
    pub fn new(chains: impl IntoIterator<Item = ChainInfo>) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.chain_id, c)).collect(),
        }
    }

    pub fn chain(&self, chain_id: ChainId) -> CoreResult<&ChainInfo> {
        self.chains
            .get(&chain_id)
            .ok_or_else(|| CoreError::not_found("chain", chain_id))
    }

    pub fn contains(&self, chain_id: ChainId) -> bool {
        self.chains.contains_key(&chain_id)
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainInfo> {
        self.chains.values()
    }

    /// CCTP domain for a chain. Forwarded chains resolve to the domain of the
    /// chain they are forwarded through.
    pub fn domain_id(&self, chain_id: ChainId) -> CoreResult<u32> {
        let chain = self.chain(chain_id)?;
        if let Some(domain) = chain.cctp_domain {
            return Ok(domain);
        }
        match chain.forwarded_via {
            Some(via) if via != chain_id => self
                .chain(via)?
                .cctp_domain
                .ok_or_else(|| CoreError::not_found("CCTP domain", via)),
            _ => Err(CoreError::not_found("CCTP domain", chain_id)),
        }
    }

    pub fn has_domain(&self, chain_id: ChainId) -> bool {
        self.domain_id(chain_id).is_ok()
    }

    pub fn periphery_address(&self, chain_id: ChainId, kind: PeripheryKind) -> CoreResult<ChainAddress> {
        self.chain(chain_id)?
            .peripheries
            .get(&kind)
            .copied()
            .ok_or_else(|| CoreError::not_found("periphery address", format!("{kind:?}@{chain_id}")))
    }

    pub fn has_periphery(&self, chain_id: ChainId, kind: PeripheryKind) -> bool {
        self.periphery_address(chain_id, kind).is_ok()
    }

    pub fn ecosystem(&self, chain_id: ChainId) -> CoreResult<Ecosystem> {
        Ok(self.chain(chain_id)?.ecosystem)
    }

    /// Unknown chains are reported as non-SVM.
    pub fn is_svm(&self, chain_id: ChainId) -> bool {
        matches!(self.ecosystem(chain_id), Ok(Ecosystem::Svm))
    }

    pub fn forwarded_via(&self, chain_id: ChainId) -> Option<ChainId> {
        self.chains.get(&chain_id).and_then(|c| c.forwarded_via)
    }

    pub fn is_forwarded(&self, chain_id: ChainId) -> bool {
        self.forwarded_via(chain_id).is_some()
    }

    pub fn requires_account_activation(&self, chain_id: ChainId) -> bool {
        self.chains
            .get(&chain_id)
            .map(|c| c.requires_account_activation)
            .unwrap_or(false)
    }

    pub fn fast_transfer_limit(&self, chain_id: ChainId) -> Option<u64> {
        self.chains.get(&chain_id).and_then(|c| c.fast_transfer_limit)
    }

    /// Expected attestation + mint time for a transfer originating on `chain_id`.
    pub fn fill_time_secs(&self, chain_id: ChainId, mode: TransferMode) -> u64 {
        let chain = self.chains.get(&chain_id);
        match mode {
            TransferMode::Fast => chain
                .and_then(|c| c.fast_fill_secs)
                .unwrap_or(DEFAULT_FAST_FILL_SECS),
            TransferMode::Standard => chain
                .and_then(|c| c.standard_fill_secs)
                .unwrap_or(DEFAULT_STANDARD_FILL_SECS),
        }
    }
}
