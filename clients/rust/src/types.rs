//! Request and response types shared by every strategy.

use std::{fmt, str::FromStr};

use alloy::primitives::{Address, Bytes, B256, U256};
use bridge_quote_core::{ChainAddress, ChainId, Ecosystem, SponsoredQuote, Token, TransferMode};
use serde::{Deserialize, Serialize};

use crate::errors::BridgeError;

/// Which side of the transfer the caller fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "amount")]
pub enum SwapAmount {
    ExactInput(U256),
    MinOutput(U256),
}

/// Two-byte integrator tag appended to deposit calldata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegratorId(pub [u8; 2]);

impl FromStr for IntegratorId {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().trim_start_matches("0x").trim_start_matches("0X");
        let bytes = hex::decode(raw)
            .map_err(|e| BridgeError::invalid_param(format!("integrator id '{s}': {e}")))?;
        let id: [u8; 2] = bytes.try_into().map_err(|_| {
            BridgeError::invalid_param(format!("integrator id '{s}' must be 2 bytes"))
        })?;
        Ok(IntegratorId(id))
    }
}

impl fmt::Display for IntegratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for IntegratorId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IntegratorId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fee taken by the integrating application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFee {
    pub bps: u32,
    pub recipient: ChainAddress,
}

/// A swap performed before or after the bridge leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapLeg {
    pub input_token: Token,
    pub output_token: Token,
}

/// The bridge leg of a request: token in, token out.
#[derive(Debug, Clone, Copy)]
pub struct Route<'a> {
    pub input_token: &'a Token,
    pub output_token: &'a Token,
}

impl Route<'_> {
    pub fn origin_chain_id(&self) -> ChainId {
        self.input_token.chain_id
    }

    pub fn destination_chain_id(&self) -> ChainId {
        self.output_token.chain_id
    }
}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} -> {}@{}",
            self.input_token.symbol,
            self.input_token.chain_id,
            self.output_token.symbol,
            self.output_token.chain_id
        )
    }
}

/// A user's transfer request. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSwap {
    pub input_token: Token,
    pub output_token: Token,
    pub depositor: ChainAddress,
    pub recipient: ChainAddress,
    pub amount: SwapAmount,
    #[serde(default)]
    pub slippage_tolerance_bps: u32,
    #[serde(default)]
    pub refund_on_origin: bool,
    #[serde(default)]
    pub refund_address: Option<ChainAddress>,
    #[serde(default)]
    pub integrator_id: Option<IntegratorId>,
    #[serde(default)]
    pub app_fee: Option<AppFee>,
    #[serde(default)]
    pub origin_swap: Option<SwapLeg>,
    #[serde(default)]
    pub destination_swap: Option<SwapLeg>,
    #[serde(default)]
    pub transfer_mode: Option<TransferMode>,
}

impl CrossSwap {
    pub fn new(
        input_token: Token,
        output_token: Token,
        depositor: impl Into<ChainAddress>,
        recipient: impl Into<ChainAddress>,
        amount: SwapAmount,
    ) -> Self {
        Self {
            input_token,
            output_token,
            depositor: depositor.into(),
            recipient: recipient.into(),
            amount,
            slippage_tolerance_bps: 0,
            refund_on_origin: true,
            refund_address: None,
            integrator_id: None,
            app_fee: None,
            origin_swap: None,
            destination_swap: None,
            transfer_mode: None,
        }
    }

    pub fn with_slippage_bps(mut self, bps: u32) -> Self {
        self.slippage_tolerance_bps = bps;
        self
    }

    pub fn with_integrator_id(mut self, id: IntegratorId) -> Self {
        self.integrator_id = Some(id);
        self
    }

    pub fn with_app_fee(mut self, fee: AppFee) -> Self {
        self.app_fee = Some(fee);
        self
    }

    pub fn with_transfer_mode(mut self, mode: TransferMode) -> Self {
        self.transfer_mode = Some(mode);
        self
    }

    pub fn with_refund_address(mut self, address: impl Into<ChainAddress>) -> Self {
        self.refund_address = Some(address.into());
        self
    }

    pub fn with_origin_swap(mut self, leg: SwapLeg) -> Self {
        self.origin_swap = Some(leg);
        self
    }

    pub fn with_destination_swap(mut self, leg: SwapLeg) -> Self {
        self.destination_swap = Some(leg);
        self
    }

    pub fn route(&self) -> Route<'_> {
        Route {
            input_token: &self.input_token,
            output_token: &self.output_token,
        }
    }

    pub fn origin_chain_id(&self) -> ChainId {
        self.input_token.chain_id
    }

    pub fn destination_chain_id(&self) -> ChainId {
        self.output_token.chain_id
    }

    pub fn origin_ecosystem(&self) -> Ecosystem {
        self.input_token.ecosystem()
    }

    pub fn destination_ecosystem(&self) -> Ecosystem {
        self.output_token.ecosystem()
    }

    pub fn has_app_fee(&self) -> bool {
        self.app_fee.as_ref().is_some_and(|fee| fee.bps > 0)
    }

    /// Origin account refunded if the deposit expires unfilled.
    pub fn refund_recipient(&self) -> ChainAddress {
        self.refund_address.unwrap_or(self.depositor)
    }
}

/// Bridge protocol that produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BridgeProvider {
    NativeIntent,
    Cctp,
    CctpSponsored,
}

impl fmt::Display for BridgeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeProvider::NativeIntent => write!(f, "native-intent"),
            BridgeProvider::Cctp => write!(f, "cctp"),
            BridgeProvider::CctpSponsored => write!(f, "cctp-sponsored"),
        }
    }
}

/// Fees charged by the bridge, in input-token units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFees {
    pub amount: U256,
    /// `1e18` = 100%
    pub pct: U256,
    pub token: Token,
}

/// Spoke-pool deposit parameters fixed at quote time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentParams {
    pub quote_timestamp: u32,
    pub fill_deadline: u32,
    pub exclusive_relayer: B256,
    pub exclusivity_deadline: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeQuote {
    pub provider: BridgeProvider,
    pub input_token: Token,
    pub output_token: Token,
    pub input_amount: U256,
    pub output_amount: U256,
    pub min_output_amount: U256,
    pub estimated_fill_time_sec: u64,
    pub fees: QuoteFees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_mode: Option<TransferMode>,
    /// Cap passed to the CCTP burn; excludes account creation fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cctp_max_fee: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentParams>,
}

/// A sponsored quote together with its authorization signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedSponsoredQuote {
    pub quote: SponsoredQuote,
    pub signature: Bytes,
}

/// Deposit transaction for the user's wallet to sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ecosystem", rename_all = "lowercase")]
pub enum UnsignedTransaction {
    #[serde(rename_all = "camelCase")]
    Evm {
        chain_id: ChainId,
        from: Address,
        to: Address,
        data: Bytes,
        value: U256,
    },
    #[serde(rename_all = "camelCase")]
    Svm {
        chain_id: ChainId,
        to: ChainAddress,
        /// Base64 of the bincode wire transaction
        data: String,
    },
}

impl UnsignedTransaction {
    pub fn chain_id(&self) -> ChainId {
        match self {
            UnsignedTransaction::Evm { chain_id, .. } | UnsignedTransaction::Svm { chain_id, .. } => {
                *chain_id
            }
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            UnsignedTransaction::Evm { .. } => Ecosystem::Evm,
            UnsignedTransaction::Svm { .. } => Ecosystem::Svm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrator_id_parse() {
        let id: IntegratorId = "0xABCD".parse().unwrap();
        assert_eq!(id.0, [0xab, 0xcd]);
        assert_eq!(id.to_string(), "0xabcd");

        assert!("0xabcdef".parse::<IntegratorId>().is_err());
        assert!("zz".parse::<IntegratorId>().is_err());
    }

    #[test]
    fn test_unsigned_transaction_tag() {
        let tx = UnsignedTransaction::Svm {
            chain_id: 1,
            to: ChainAddress::Svm(solana_sdk::pubkey::Pubkey::new_unique()),
            data: "AQ==".to_string(),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["ecosystem"], "svm");
        assert_eq!(json["chainId"], 1);
    }
}
