use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use bridge_quote_core::{ISponsoredCCTPSrcPeriphery, PeripheryKind};

use super::{deposit_tags, CctpBurnTerms, DepositPlan};
use crate::{
    config::EngineConfig,
    errors::{BridgeError, BridgeResult},
    types::{BridgeQuote, CrossSwap, UnsignedTransaction},
};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface ISpokePool {
        function deposit(
            bytes32 depositor,
            bytes32 recipient,
            bytes32 inputToken,
            bytes32 outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 destinationChainId,
            bytes32 exclusiveRelayer,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityParameter,
            bytes calldata message
        ) external payable;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ITokenMessengerV2 {
        function depositForBurn(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken,
            bytes32 destinationCaller,
            uint256 maxFee,
            uint32 minFinalityThreshold
        ) external;

        function depositForBurnWithHook(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken,
            bytes32 destinationCaller,
            uint256 maxFee,
            uint32 minFinalityThreshold,
            bytes calldata hookData
        ) external;
    }
}

pub(super) fn build(
    config: &EngineConfig,
    swap: &CrossSwap,
    plan: DepositPlan<'_>,
) -> BridgeResult<UnsignedTransaction> {
    let chains = &config.chains;
    let origin = swap.origin_chain_id();

    let (kind, mut data) = match plan {
        DepositPlan::SpokePool { quote } => (PeripheryKind::SpokePool, spoke_pool_deposit(swap, quote)?),
        DepositPlan::Cctp { quote } => {
            let terms = CctpBurnTerms::new(chains, swap, quote)?;
            (
                PeripheryKind::TokenMessenger,
                cctp_deposit(swap.input_token.address.as_evm()?, quote.input_amount, terms),
            )
        }
        DepositPlan::Sponsored { signed, .. } => {
            let call = ISponsoredCCTPSrcPeriphery::depositForBurnCall {
                quote: signed.quote.to_sol(),
                signature: signed.signature.clone(),
            };
            (PeripheryKind::SponsoredSrcPeriphery, call.abi_encode())
        }
    };
    data.extend_from_slice(&deposit_tags(swap.integrator_id));

    let to = chains.periphery_address(origin, kind)?.as_evm()?;
    Ok(UnsignedTransaction::Evm {
        chain_id: origin,
        from: swap.depositor.as_evm()?,
        to,
        data: Bytes::from(data),
        value: U256::ZERO,
    })
}

fn spoke_pool_deposit(swap: &CrossSwap, quote: &BridgeQuote) -> BridgeResult<Vec<u8>> {
    let intent = quote
        .intent
        .ok_or_else(|| BridgeError::invalid_param("intent quote without deposit parameters"))?;

    let call = ISpokePool::depositCall {
        depositor: swap.refund_recipient().to_bytes32(),
        recipient: swap.recipient.to_bytes32(),
        inputToken: swap.input_token.address.to_bytes32(),
        outputToken: swap.output_token.address.to_bytes32(),
        inputAmount: quote.input_amount,
        outputAmount: quote.output_amount,
        destinationChainId: U256::from(swap.destination_chain_id()),
        exclusiveRelayer: intent.exclusive_relayer,
        quoteTimestamp: intent.quote_timestamp,
        fillDeadline: intent.fill_deadline,
        exclusivityParameter: intent.exclusivity_deadline,
        message: Bytes::new(),
    };
    Ok(call.abi_encode())
}

fn cctp_deposit(burn_token: Address, amount: U256, terms: CctpBurnTerms) -> Vec<u8> {
    match terms.hook_data {
        Some(hook_data) => ITokenMessengerV2::depositForBurnWithHookCall {
            amount,
            destinationDomain: terms.destination_domain,
            mintRecipient: terms.mint_recipient,
            burnToken: burn_token,
            destinationCaller: terms.destination_caller,
            maxFee: terms.max_fee,
            minFinalityThreshold: terms.min_finality_threshold,
            hookData: hook_data,
        }
        .abi_encode(),
        None => ITokenMessengerV2::depositForBurnCall {
            amount,
            destinationDomain: terms.destination_domain,
            mintRecipient: terms.mint_recipient,
            burnToken: burn_token,
            destinationCaller: terms.destination_caller,
            maxFee: terms.max_fee,
            minFinalityThreshold: terms.min_finality_threshold,
        }
        .abi_encode(),
    }
}
