//! Bridge Quote Core
//!
//! Synchronous building blocks shared by the quote engine:
//!
//! - **Chains**: chain id → CCTP domain, finality thresholds, periphery contracts
//! - **Addresses**: ecosystem-tagged addresses and their `bytes32` form
//! - **Tokens**: static token registry
//! - **Decimals**: precision conversion between token representations
//! - **Fees**: checked basis-point fee arithmetic
//! - **Sponsored quotes**: the signed authorization layout, nonce and digest
//!
//! Nothing in this crate performs I/O.

pub mod address;
pub mod chains;
pub mod decimals;
pub mod error;
pub mod fees;
pub mod sponsored;
pub mod token;

pub use address::{ChainAddress, Ecosystem};
pub use chains::{ChainDomainRegistry, ChainId, ChainInfo, PeripheryKind, TransferMode};
pub use decimals::{convert_decimals, convert_decimals_ceil};
pub use error::{CoreError, CoreResult};
pub use fees::{
    calculate_cctp_fee, fee_pct, invert_linear_fee, max_fee_bps_ceil, CctpFee, FeeResult,
    BPS_DENOMINATOR, PCT_SCALE,
};
pub use sponsored::{
    generate_nonce, ExecutionMode, ISponsoredCCTPSrcPeriphery, SponsoredCCTPQuote, SponsoredQuote,
    SvmSponsoredQuote,
};
pub use token::{Token, TokenRegistry};
