//! Sponsored CCTP quote layout.
//!
//! The field order of [`SponsoredCCTPQuote`] is part of the signature
//! pre-image and must match the verifying periphery contract exactly.

use alloy::{
    primitives::{keccak256, Bytes, B256, U256},
    sol,
    sol_types::SolValue,
};
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{CoreError, CoreResult};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct SponsoredCCTPQuote {
        uint32 sourceDomain;
        uint32 destinationDomain;
        bytes32 mintRecipient;
        uint256 amount;
        bytes32 burnToken;
        bytes32 destinationCaller;
        uint256 maxFee;
        uint32 minFinalityThreshold;
        bytes32 nonce;
        uint256 deadline;
        uint256 maxBpsToSponsor;
        uint256 maxUserSlippageBps;
        bytes32 finalRecipient;
        bytes32 finalToken;
        uint8 executionMode;
        bytes actionData;
    }

    #[derive(Debug)]
    interface ISponsoredCCTPSrcPeriphery {
        function depositForBurn(SponsoredCCTPQuote calldata quote, bytes calldata signature) external;
    }
}

/// What the destination handler does with the minted funds.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ExecutionMode {
    #[default]
    Default = 0,
    ArbitraryActionsToCore = 1,
    ArbitraryActionsToEVM = 2,
}

impl From<ExecutionMode> for u8 {
    fn from(mode: ExecutionMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for ExecutionMode {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ExecutionMode::Default),
            1 => Ok(ExecutionMode::ArbitraryActionsToCore),
            2 => Ok(ExecutionMode::ArbitraryActionsToEVM),
            other => Err(CoreError::InvalidExecutionMode(other)),
        }
    }
}

/// Off-chain authorization for a sponsored CCTP deposit.
#[cfg_attr(feature = "serialize_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsoredQuote {
    pub source_domain: u32,
    pub destination_domain: u32,
    pub mint_recipient: B256,
    pub amount: U256,
    pub burn_token: B256,
    pub destination_caller: B256,
    pub max_fee: U256,
    pub min_finality_threshold: u32,
    pub nonce: B256,
    /// Unix seconds.
    pub deadline: U256,
    pub max_bps_to_sponsor: U256,
    pub max_user_slippage_bps: U256,
    pub final_recipient: B256,
    pub final_token: B256,
    pub execution_mode: ExecutionMode,
    pub action_data: Bytes,
}

impl SponsoredQuote {
    pub fn to_sol(&self) -> SponsoredCCTPQuote {
        SponsoredCCTPQuote {
            sourceDomain: self.source_domain,
            destinationDomain: self.destination_domain,
            mintRecipient: self.mint_recipient,
            amount: self.amount,
            burnToken: self.burn_token,
            destinationCaller: self.destination_caller,
            maxFee: self.max_fee,
            minFinalityThreshold: self.min_finality_threshold,
            nonce: self.nonce,
            deadline: self.deadline,
            maxBpsToSponsor: self.max_bps_to_sponsor,
            maxUserSlippageBps: self.max_user_slippage_bps,
            finalRecipient: self.final_recipient,
            finalToken: self.final_token,
            executionMode: self.execution_mode.into(),
            actionData: self.action_data.clone(),
        }
    }

    /// Canonical `abi.encode(quote)` bytes.
    pub fn abi_bytes(&self) -> Vec<u8> {
        self.to_sol().abi_encode()
    }

    /// Digest the periphery recovers the signer from.
    ///
    /// `keccak256(abi.encode(keccak256(abi.encode(fields 1..=8)),
    /// keccak256(abi.encode(fields 9..=15, keccak256(actionData)))))`.
    pub fn signing_digest(&self) -> B256 {
        let head = keccak256(
            (
                self.source_domain,
                self.destination_domain,
                self.mint_recipient,
                self.amount,
                self.burn_token,
                self.destination_caller,
                self.max_fee,
                self.min_finality_threshold,
            )
                .abi_encode(),
        );
        let tail = keccak256(
            (
                self.nonce,
                self.deadline,
                self.max_bps_to_sponsor,
                self.max_user_slippage_bps,
                self.final_recipient,
                self.final_token,
                U256::from(u8::from(self.execution_mode)),
                keccak256(&self.action_data),
            )
                .abi_encode(),
        );
        keccak256((head, tail).abi_encode())
    }

    /// Borsh layout accepted by the SVM sponsored periphery.
    pub fn to_svm(&self) -> CoreResult<SvmSponsoredQuote> {
        Ok(SvmSponsoredQuote {
            source_domain: self.source_domain,
            destination_domain: self.destination_domain,
            mint_recipient: self.mint_recipient.0,
            amount: to_u64(self.amount)?,
            burn_token: self.burn_token.0,
            destination_caller: self.destination_caller.0,
            max_fee: to_u64(self.max_fee)?,
            min_finality_threshold: self.min_finality_threshold,
            nonce: self.nonce.0,
            deadline: to_u64(self.deadline)?,
            max_bps_to_sponsor: to_u64(self.max_bps_to_sponsor)?,
            max_user_slippage_bps: to_u64(self.max_user_slippage_bps)?,
            final_recipient: self.final_recipient.0,
            final_token: self.final_token.0,
            execution_mode: self.execution_mode.into(),
            action_data: self.action_data.to_vec(),
        })
    }
}

fn to_u64(value: U256) -> CoreResult<u64> {
    u64::try_from(value).map_err(|_| CoreError::AmountTooLarge(value.to_string()))
}

/// [`SponsoredQuote`] with SVM-width integers.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SvmSponsoredQuote {
    pub source_domain: u32,
    pub destination_domain: u32,
    pub mint_recipient: [u8; 32],
    pub amount: u64,
    pub burn_token: [u8; 32],
    pub destination_caller: [u8; 32],
    pub max_fee: u64,
    pub min_finality_threshold: u32,
    pub nonce: [u8; 32],
    pub deadline: u64,
    pub max_bps_to_sponsor: u64,
    pub max_user_slippage_bps: u64,
    pub final_recipient: [u8; 32],
    pub final_token: [u8; 32],
    pub execution_mode: u8,
    pub action_data: Vec<u8>,
}

/// `keccak256(abi.encode(uint256 timestamp_ms, bytes32 depositor))`
///
/// Not coordinated across requests: the same depositor quoting twice within
/// one millisecond receives the same nonce.
pub fn generate_nonce(timestamp_ms: u64, depositor: B256) -> B256 {
    keccak256((U256::from(timestamp_ms), depositor).abi_encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    fn quote() -> SponsoredQuote {
        SponsoredQuote {
            source_domain: 3,
            destination_domain: 19,
            mint_recipient: Address::repeat_byte(0x11).into_word(),
            amount: U256::from(1_000_000u64),
            burn_token: Address::repeat_byte(0xaf).into_word(),
            destination_caller: Address::repeat_byte(0x22).into_word(),
            max_fee: U256::from(100u64),
            min_finality_threshold: 1000,
            nonce: generate_nonce(1_700_000_000_000, Address::repeat_byte(0x33).into_word()),
            deadline: U256::from(1_700_000_300u64),
            max_bps_to_sponsor: U256::from(1u64),
            max_user_slippage_bps: U256::from(50u64),
            final_recipient: Address::repeat_byte(0x44).into_word(),
            final_token: Address::repeat_byte(0x55).into_word(),
            execution_mode: ExecutionMode::Default,
            action_data: Bytes::new(),
        }
    }

    #[test]
    fn test_abi_layout() {
        let bytes = quote().abi_bytes();
        // dynamic struct: leading offset word, 16 head words, then the empty bytes tail
        assert_eq!(bytes.len(), 32 + 16 * 32 + 32);
        assert_eq!(U256::from_be_slice(&bytes[..32]), U256::from(32u64));
        // sourceDomain is the first head word
        assert_eq!(U256::from_be_slice(&bytes[32..64]), U256::from(3u64));
        // minFinalityThreshold is the eighth
        assert_eq!(U256::from_be_slice(&bytes[32 + 7 * 32..32 + 8 * 32]), U256::from(1000u64));
    }

    #[test]
    fn test_digest_covers_every_field() {
        let base = quote();
        let digest = base.signing_digest();

        let mut changed = base.clone();
        changed.max_bps_to_sponsor = U256::from(2u64);
        assert_ne!(changed.signing_digest(), digest);

        let mut changed = base.clone();
        changed.action_data = Bytes::from_static(&[1]);
        assert_ne!(changed.signing_digest(), digest);

        let mut changed = base;
        changed.execution_mode = ExecutionMode::ArbitraryActionsToCore;
        assert_ne!(changed.signing_digest(), digest);
    }

    fn split_hash(q: &SponsoredQuote) -> B256 {
        let mut head = Vec::new();
        head.extend_from_slice(&U256::from(q.source_domain).to_be_bytes::<32>());
        head.extend_from_slice(&U256::from(q.destination_domain).to_be_bytes::<32>());
        head.extend_from_slice(q.mint_recipient.as_slice());
        head.extend_from_slice(&q.amount.to_be_bytes::<32>());
        head.extend_from_slice(q.burn_token.as_slice());
        head.extend_from_slice(q.destination_caller.as_slice());
        head.extend_from_slice(&q.max_fee.to_be_bytes::<32>());
        head.extend_from_slice(&U256::from(q.min_finality_threshold).to_be_bytes::<32>());

        let mut tail = Vec::new();
        tail.extend_from_slice(q.nonce.as_slice());
        tail.extend_from_slice(&q.deadline.to_be_bytes::<32>());
        tail.extend_from_slice(&q.max_bps_to_sponsor.to_be_bytes::<32>());
        tail.extend_from_slice(&q.max_user_slippage_bps.to_be_bytes::<32>());
        tail.extend_from_slice(q.final_recipient.as_slice());
        tail.extend_from_slice(q.final_token.as_slice());
        // uint8 occupies a full left-padded word
        tail.extend_from_slice(&U256::from(u8::from(q.execution_mode)).to_be_bytes::<32>());
        tail.extend_from_slice(keccak256(&q.action_data).as_slice());

        let mut outer = Vec::new();
        outer.extend_from_slice(keccak256(&head).as_slice());
        outer.extend_from_slice(keccak256(&tail).as_slice());
        keccak256(&outer)
    }

    #[test]
    fn test_digest_is_split_hash() {
        let q = quote();
        assert_eq!(q.signing_digest(), split_hash(&q));
    }

    #[test]
    fn test_digest_covers_execution_mode() {
        let mut q = quote();
        q.execution_mode = ExecutionMode::ArbitraryActionsToCore;
        q.action_data = Bytes::from_static(&[0xde, 0xad]);

        assert_eq!(q.signing_digest(), split_hash(&q));
        assert_ne!(q.signing_digest(), quote().signing_digest());
    }

    #[test]
    fn test_nonce_depends_on_time_and_depositor() {
        let depositor = Address::repeat_byte(0x33).into_word();
        let a = generate_nonce(1, depositor);
        assert_eq!(a, generate_nonce(1, depositor));
        assert_ne!(a, generate_nonce(2, depositor));
        assert_ne!(a, generate_nonce(1, Address::repeat_byte(0x34).into_word()));
    }

    #[test]
    fn test_svm_layout_rejects_wide_amounts() {
        let mut q = quote();
        let svm = q.to_svm().unwrap();
        assert_eq!(svm.amount, 1_000_000);
        assert_eq!(svm.mint_recipient, q.mint_recipient.0);

        q.amount = U256::from(u64::MAX) + U256::from(1u8);
        assert!(matches!(q.to_svm(), Err(CoreError::AmountTooLarge(_))));
    }

    #[test]
    fn test_execution_mode_codes() {
        assert_eq!(u8::from(ExecutionMode::ArbitraryActionsToEVM), 2);
        assert_eq!(ExecutionMode::try_from(1).unwrap(), ExecutionMode::ArbitraryActionsToCore);
        assert!(ExecutionMode::try_from(3).is_err());
    }
}
