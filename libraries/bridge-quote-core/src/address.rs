//! Ecosystem-tagged addresses.
//!
//! Bridge protocols address every chain with a 32-byte word: EVM addresses are
//! left-padded, SVM public keys are used as-is.

use std::{fmt, str::FromStr};

use alloy::primitives::{Address, B256};
use solana_program::pubkey::Pubkey;

use crate::error::{CoreError, CoreResult};

/// Virtual-machine family a chain belongs to.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Evm,
    Svm,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::Evm => write!(f, "evm"),
            Ecosystem::Svm => write!(f, "svm"),
        }
    }
}

/// An address in its ecosystem-native form.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(try_from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainAddress {
    Evm(Address),
    Svm(Pubkey),
}

impl ChainAddress {
    /// Parse an address, inferring the ecosystem from its encoding
    /// (`0x`-prefixed hex is EVM, anything else is base58 SVM).
    pub fn parse(value: &str) -> CoreResult<Self> {
        let trimmed = value.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            Self::parse_for(Ecosystem::Evm, trimmed)
        } else {
            Self::parse_for(Ecosystem::Svm, trimmed)
        }
    }

    /// Parse an address for a known ecosystem.
    pub fn parse_for(ecosystem: Ecosystem, value: &str) -> CoreResult<Self> {
        let invalid = |reason: String| CoreError::InvalidAddress {
            value: value.to_string(),
            reason,
        };
        match ecosystem {
            Ecosystem::Evm => Address::from_str(value.trim())
                .map(ChainAddress::Evm)
                .map_err(|e| invalid(e.to_string())),
            Ecosystem::Svm => Pubkey::from_str(value.trim())
                .map(ChainAddress::Svm)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            ChainAddress::Evm(_) => Ecosystem::Evm,
            ChainAddress::Svm(_) => Ecosystem::Svm,
        }
    }

    /// The 32-byte word used by bridge protocols to address this account.
    pub fn to_bytes32(&self) -> B256 {
        match self {
            ChainAddress::Evm(address) => address.into_word(),
            ChainAddress::Svm(pubkey) => B256::from(pubkey.to_bytes()),
        }
    }

    pub fn as_evm(&self) -> CoreResult<Address> {
        match self {
            ChainAddress::Evm(address) => Ok(*address),
            ChainAddress::Svm(pubkey) => Err(CoreError::InvalidAddress {
                value: pubkey.to_string(),
                reason: "expected an EVM address".to_string(),
            }),
        }
    }

    pub fn as_svm(&self) -> CoreResult<Pubkey> {
        match self {
            ChainAddress::Svm(pubkey) => Ok(*pubkey),
            ChainAddress::Evm(address) => Err(CoreError::InvalidAddress {
                value: address.to_string(),
                reason: "expected an SVM public key".to_string(),
            }),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            ChainAddress::Evm(address) => address.is_zero(),
            ChainAddress::Svm(pubkey) => *pubkey == Pubkey::default(),
        }
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainAddress::Evm(address) => write!(f, "{}", address.to_checksum(None)),
            ChainAddress::Svm(pubkey) => write!(f, "{pubkey}"),
        }
    }
}

impl From<Address> for ChainAddress {
    fn from(address: Address) -> Self {
        ChainAddress::Evm(address)
    }
}

impl From<Pubkey> for ChainAddress {
    fn from(pubkey: Pubkey) -> Self {
        ChainAddress::Svm(pubkey)
    }
}

impl TryFrom<String> for ChainAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ChainAddress::parse(&value)
    }
}

impl From<ChainAddress> for String {
    fn from(value: ChainAddress) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_evm_address_left_padded() {
        let addr = ChainAddress::Evm(address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        let word = addr.to_bytes32();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], addr.as_evm().unwrap().as_slice());
    }

    #[test]
    fn test_svm_pubkey_is_raw_word() {
        let key = Pubkey::new_unique();
        let addr = ChainAddress::Svm(key);
        assert_eq!(addr.to_bytes32().0, key.to_bytes());
        assert_eq!(addr.ecosystem(), Ecosystem::Svm);
    }

    #[test]
    fn test_parse_infers_ecosystem() {
        let evm = ChainAddress::parse("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913").unwrap();
        assert_eq!(evm.ecosystem(), Ecosystem::Evm);

        let svm = ChainAddress::parse("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        assert_eq!(svm.ecosystem(), Ecosystem::Svm);

        assert!(ChainAddress::parse("0x1234").is_err());
        assert!(ChainAddress::parse_for(Ecosystem::Evm, "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").is_err());
    }

    #[test]
    fn test_wrong_ecosystem_accessors() {
        let svm = ChainAddress::Svm(Pubkey::new_unique());
        assert!(svm.as_evm().is_err());
        assert!(svm.as_svm().is_ok());
    }

    #[test]
    fn test_serde_as_string() {
        let addr = ChainAddress::parse("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913\"");
        let back: ChainAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
