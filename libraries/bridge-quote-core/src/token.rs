//! Static token configuration.

use crate::{
    address::{ChainAddress, Ecosystem},
    chains::ChainId,
    error::{CoreError, CoreResult},
};

/// A token on a specific chain.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: ChainAddress,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(chain_id: ChainId, address: impl Into<ChainAddress>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            chain_id,
            address: address.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.address.ecosystem()
    }

    /// Case-insensitive symbol comparison.
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol)
    }
}

/// Tokens known to the engine, keyed by chain.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn by_symbol(&self, chain_id: ChainId, symbol: &str) -> CoreResult<&Token> {
        self.tokens
            .iter()
            .find(|t| t.chain_id == chain_id && t.is_symbol(symbol))
            .ok_or_else(|| CoreError::not_found("token", format!("{symbol}@{chain_id}")))
    }

    pub fn by_address(&self, chain_id: ChainId, address: &ChainAddress) -> CoreResult<&Token> {
        self.tokens
            .iter()
            .find(|t| t.chain_id == chain_id && &t.address == address)
            .ok_or_else(|| CoreError::not_found("token", format!("{address}@{chain_id}")))
    }

    pub fn on_chain(&self, chain_id: ChainId) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |t| t.chain_id == chain_id)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn test_lookup_by_symbol_and_address() {
        let usdc = Token::new(42161, Address::repeat_byte(1), "USDC", 6);
        let registry = TokenRegistry::new([usdc.clone()]);

        assert_eq!(registry.by_symbol(42161, "usdc").unwrap(), &usdc);
        assert_eq!(registry.by_address(42161, &usdc.address).unwrap(), &usdc);
        assert!(registry.by_symbol(8453, "USDC").unwrap_err().is_config_error());
    }
}
