use base64::{engine::general_purpose::STANDARD, Engine};
use bridge_quote_core::{ChainAddress, PeripheryKind};
use solana_sdk::{
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};

use super::{deposit_tags, CctpBurnTerms, DepositPlan};
use crate::{
    config::EngineConfig,
    errors::{BridgeError, BridgeResult},
    instructions::{self, DepositForBurnParams, SponsoredDepositForBurnParams},
    types::{CrossSwap, UnsignedTransaction},
};

fn amount_u64(value: alloy::primitives::U256, what: &str) -> BridgeResult<u64> {
    u64::try_from(value)
        .map_err(|_| BridgeError::invalid_param(format!("{what} {value} does not fit in u64")))
}

pub(super) fn build(
    config: &EngineConfig,
    swap: &CrossSwap,
    plan: DepositPlan<'_>,
    blockhash: Hash,
) -> BridgeResult<UnsignedTransaction> {
    let chains = &config.chains;
    let programs = &config.svm_programs;
    let origin = swap.origin_chain_id();
    let depositor = swap.depositor.as_svm()?;
    let burn_token_mint = swap.input_token.address.as_svm()?;
    let event_data = Keypair::new();

    let (program_id, deposit) = match plan {
        DepositPlan::SpokePool { .. } => {
            return Err(BridgeError::route_not_supported(
                "intent deposits are not available from SVM origins",
            ))
        }
        DepositPlan::Cctp { quote } => {
            let terms = CctpBurnTerms::new(chains, swap, quote)?;
            if terms.hook_data.is_some() {
                return Err(BridgeError::route_not_supported(
                    "forwarded CCTP routes are not available from SVM origins",
                ));
            }
            let params = DepositForBurnParams {
                amount: amount_u64(quote.input_amount, "amount")?,
                destination_domain: terms.destination_domain,
                mint_recipient: terms.mint_recipient.0,
                destination_caller: terms.destination_caller.0,
                max_fee: amount_u64(terms.max_fee, "max fee")?,
                min_finality_threshold: terms.min_finality_threshold,
            };
            let ix = instructions::deposit_for_burn(
                programs,
                depositor,
                burn_token_mint,
                event_data.pubkey(),
                &params,
            );
            (programs.token_messenger_minter, ix)
        }
        DepositPlan::Sponsored { signed, .. } => {
            let program_id = chains
                .periphery_address(origin, PeripheryKind::SponsoredSrcPeriphery)?
                .as_svm()?;
            let params = SponsoredDepositForBurnParams {
                quote: signed.quote.to_svm()?,
                signature: signed.signature.to_vec(),
            };
            let ix = instructions::sponsored_deposit_for_burn(
                program_id,
                programs,
                depositor,
                burn_token_mint,
                event_data.pubkey(),
                &params,
            );
            (program_id, ix)
        }
    };
    let deposit = deposit.map_err(|e| BridgeError::Internal(e.into()))?;
    let memo = instructions::memo(&deposit_tags(swap.integrator_id));

    let data = partially_signed(&[deposit, memo], &depositor, &event_data, blockhash)?;
    Ok(UnsignedTransaction::Svm {
        chain_id: origin,
        to: ChainAddress::Svm(program_id),
        data,
    })
}

/// Compile with `payer` as fee payer and sign with the event account only.
fn partially_signed(
    instructions: &[solana_sdk::instruction::Instruction],
    payer: &Pubkey,
    event_data: &Keypair,
    blockhash: Hash,
) -> BridgeResult<String> {
    let message = Message::new_with_blockhash(instructions, Some(payer), &blockhash);
    let mut tx = Transaction::new_unsigned(message);
    tx.try_partial_sign(&[event_data], blockhash)
        .map_err(|e| BridgeError::Internal(e.into()))?;

    let bytes = bincode::serialize(&tx).map_err(|e| BridgeError::Internal(e.into()))?;
    Ok(STANDARD.encode(bytes))
}
