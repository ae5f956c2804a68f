use solana_sdk::{pubkey, pubkey::Pubkey};

/// Precedes the 2-byte integrator id in tagged calldata.
pub const INTEGRATOR_DELIMITER: [u8; 3] = [0x1d, 0xc0, 0xde];

/// Trails every deposit built by this engine.
pub const SWAP_API_MARKER: [u8; 3] = [0x73, 0xc0, 0xde];

// CCTP v2 programs
pub const CCTP_MESSAGE_TRANSMITTER_PROGRAM_ID: Pubkey =
    pubkey!("CCTPV2Sm4AdWt5296sk4P66VBZ7bEhcARwFaaS9YPbeC");
pub const CCTP_TOKEN_MESSENGER_MINTER_PROGRAM_ID: Pubkey =
    pubkey!("CCTPV2vPZJS2u2BBsUoscuikbYjnpFmbFsvVuJdgUMQe");

pub const MEMO_PROGRAM_ID: Pubkey = pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

pub const DEFAULT_QUOTE_VALIDITY_SECS: u64 = 300;
/// HyperCore charges 1 USDC to activate a new account.
pub const DEFAULT_ACCOUNT_CREATION_FEE: u64 = 1_000_000;
pub const DEFAULT_STABLE_SYMBOL: &str = "USDC";

pub const HYPERLIQUID_API_URL: &str = "https://api.hyperliquid.xyz";
pub const IRIS_API_URL: &str = "https://iris-api.circle.com";
pub const SUGGESTED_FEES_API_URL: &str = "https://app.across.to";
pub const SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
