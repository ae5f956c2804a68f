//! SVM instruction builders for CCTP deposits.

use borsh::{BorshDeserialize, BorshSerialize};
use bridge_quote_core::SvmSponsoredQuote;
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};
use spl_associated_token_account::get_associated_token_address;

use crate::{config::SvmProgramsConfig, constants::MEMO_PROGRAM_ID};

/// Anchor global instruction discriminator: `sha256("global:<name>")[..8]`.
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("global:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

pub fn anchor_data<T: BorshSerialize>(name: &str, params: &T) -> std::io::Result<Vec<u8>> {
    let mut data = anchor_discriminator(name).to_vec();
    data.extend_from_slice(&borsh::to_vec(params)?);
    Ok(data)
}

fn event_authority(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"__event_authority"], program_id).0
}

/// CCTP accounts touched by a burn of `burn_token_mint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CctpAccounts {
    pub sender_authority: Pubkey,
    pub denylist: Pubkey,
    pub message_transmitter: Pubkey,
    pub token_messenger: Pubkey,
    pub remote_token_messenger: Pubkey,
    pub token_minter: Pubkey,
    pub local_token: Pubkey,
    pub event_authority: Pubkey,
}

impl CctpAccounts {
    pub fn derive(
        programs: &SvmProgramsConfig,
        depositor: &Pubkey,
        burn_token_mint: &Pubkey,
        destination_domain: u32,
    ) -> Self {
        let tmm = &programs.token_messenger_minter;
        let pda = |seeds: &[&[u8]]| Pubkey::find_program_address(seeds, tmm).0;
        let domain = destination_domain.to_string();

        Self {
            sender_authority: pda(&[b"sender_authority"]),
            denylist: pda(&[b"denylist_account", depositor.as_ref()]),
            message_transmitter: Pubkey::find_program_address(
                &[b"message_transmitter"],
                &programs.message_transmitter,
            )
            .0,
            token_messenger: pda(&[b"token_messenger"]),
            remote_token_messenger: pda(&[b"remote_token_messenger", domain.as_bytes()]),
            token_minter: pda(&[b"token_minter"]),
            local_token: pda(&[b"local_token", burn_token_mint.as_ref()]),
            event_authority: event_authority(tmm),
        }
    }
}

/// Sponsored periphery state accounts for one nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SponsoredAccounts {
    pub state: Pubkey,
    pub rent_fund: Pubkey,
    pub used_nonce: Pubkey,
    pub event_authority: Pubkey,
}

impl SponsoredAccounts {
    pub fn derive(program_id: &Pubkey, nonce: &[u8; 32]) -> Self {
        let pda = |seeds: &[&[u8]]| Pubkey::find_program_address(seeds, program_id).0;
        Self {
            state: pda(&[b"state"]),
            rent_fund: pda(&[b"rent_fund"]),
            used_nonce: pda(&[b"used_nonce", nonce.as_ref()]),
            event_authority: event_authority(program_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DepositForBurnParams {
    pub amount: u64,
    pub destination_domain: u32,
    pub mint_recipient: [u8; 32],
    pub destination_caller: [u8; 32],
    pub max_fee: u64,
    pub min_finality_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SponsoredDepositForBurnParams {
    pub quote: SvmSponsoredQuote,
    pub signature: Vec<u8>,
}

/// TokenMessengerMinter `deposit_for_burn`.
pub fn deposit_for_burn(
    programs: &SvmProgramsConfig,
    owner: Pubkey,
    burn_token_mint: Pubkey,
    message_sent_event_data: Pubkey,
    params: &DepositForBurnParams,
) -> std::io::Result<Instruction> {
    let cctp = CctpAccounts::derive(programs, &owner, &burn_token_mint, params.destination_domain);
    let burn_token_account = get_associated_token_address(&owner, &burn_token_mint);
    let program_id = programs.token_messenger_minter;

    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new_readonly(owner, true),
            // event rent payer
            AccountMeta::new(owner, true),
            AccountMeta::new_readonly(cctp.sender_authority, false),
            AccountMeta::new(burn_token_account, false),
            AccountMeta::new_readonly(cctp.denylist, false),
            AccountMeta::new(cctp.message_transmitter, false),
            AccountMeta::new_readonly(cctp.token_messenger, false),
            AccountMeta::new_readonly(cctp.remote_token_messenger, false),
            AccountMeta::new_readonly(cctp.token_minter, false),
            AccountMeta::new(cctp.local_token, false),
            AccountMeta::new(burn_token_mint, false),
            AccountMeta::new(message_sent_event_data, true),
            AccountMeta::new_readonly(programs.message_transmitter, false),
            AccountMeta::new_readonly(program_id, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(cctp.event_authority, false),
            AccountMeta::new_readonly(program_id, false),
        ],
        data: anchor_data("deposit_for_burn", params)?,
    })
}

/// Sponsored periphery `deposit_for_burn`.
pub fn sponsored_deposit_for_burn(
    program_id: Pubkey,
    programs: &SvmProgramsConfig,
    signer: Pubkey,
    burn_token_mint: Pubkey,
    message_sent_event_data: Pubkey,
    params: &SponsoredDepositForBurnParams,
) -> std::io::Result<Instruction> {
    let quote = &params.quote;
    let periphery = SponsoredAccounts::derive(&program_id, &quote.nonce);
    let cctp = CctpAccounts::derive(programs, &signer, &burn_token_mint, quote.destination_domain);
    let depositor_token_account = get_associated_token_address(&signer, &burn_token_mint);

    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(signer, true),
            AccountMeta::new_readonly(periphery.state, false),
            AccountMeta::new(periphery.rent_fund, false),
            AccountMeta::new(periphery.used_nonce, false),
            AccountMeta::new(depositor_token_account, false),
            AccountMeta::new(burn_token_mint, false),
            AccountMeta::new_readonly(cctp.denylist, false),
            AccountMeta::new_readonly(cctp.sender_authority, false),
            AccountMeta::new(cctp.message_transmitter, false),
            AccountMeta::new_readonly(cctp.token_messenger, false),
            AccountMeta::new_readonly(cctp.remote_token_messenger, false),
            AccountMeta::new_readonly(cctp.token_minter, false),
            AccountMeta::new(cctp.local_token, false),
            AccountMeta::new_readonly(cctp.event_authority, false),
            AccountMeta::new(message_sent_event_data, true),
            AccountMeta::new_readonly(programs.message_transmitter, false),
            AccountMeta::new_readonly(programs.token_messenger_minter, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(periphery.event_authority, false),
            AccountMeta::new_readonly(program_id, false),
        ],
        data: anchor_data("deposit_for_burn", params)?,
    })
}

/// Memo carrying the hex form of the deposit tags.
pub fn memo(tags: &[u8]) -> Instruction {
    Instruction {
        program_id: MEMO_PROGRAM_ID,
        accounts: vec![],
        data: hex::encode(tags).into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn params() -> DepositForBurnParams {
        DepositForBurnParams {
            amount: 1_000_000,
            destination_domain: 6,
            mint_recipient: [7u8; 32],
            destination_caller: [0u8; 32],
            max_fee: 100,
            min_finality_threshold: 1000,
        }
    }

    #[test]
    fn test_anchor_discriminator() {
        // sha256("global:deposit_for_burn")
        let expected = Sha256::digest(b"global:deposit_for_burn");
        assert_eq!(anchor_discriminator("deposit_for_burn"), expected[..8]);
        assert_ne!(
            anchor_discriminator("deposit_for_burn"),
            anchor_discriminator("deposit_for_burn_with_hook")
        );
    }

    #[test]
    fn test_deposit_for_burn_layout() {
        let programs = SvmProgramsConfig::default();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let event = Pubkey::new_unique();

        let ix = deposit_for_burn(&programs, owner, mint, event, &params()).unwrap();
        assert_eq!(ix.program_id, programs.token_messenger_minter);
        assert_eq!(ix.accounts.len(), 18);
        assert_eq!(ix.accounts[0].pubkey, owner);
        assert_eq!(ix.accounts[3].pubkey, get_associated_token_address(&owner, &mint));
        assert_eq!(ix.accounts[10].pubkey, mint);
        assert_eq!(ix.accounts[11].pubkey, event);
        assert!(ix.accounts[11].is_signer);
        assert_eq!(ix.accounts[17].pubkey, programs.token_messenger_minter);

        // discriminator, then the borsh params
        assert_eq!(&ix.data[..8], &anchor_discriminator("deposit_for_burn"));
        assert_eq!(ix.data.len(), 8 + 8 + 4 + 32 + 32 + 8 + 4);
        assert_eq!(&ix.data[8..16], &1_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_remote_token_messenger_uses_domain_string() {
        let programs = SvmProgramsConfig::default();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let a = CctpAccounts::derive(&programs, &owner, &mint, 6);
        let b = CctpAccounts::derive(&programs, &owner, &mint, 19);
        assert_ne!(a.remote_token_messenger, b.remote_token_messenger);
        assert_eq!(a.local_token, b.local_token);

        let (expected, _) = Pubkey::find_program_address(
            &[b"remote_token_messenger", b"6"],
            &programs.token_messenger_minter,
        );
        assert_eq!(a.remote_token_messenger, expected);
    }

    #[test]
    fn test_used_nonce_is_per_nonce() {
        let program = Pubkey::new_unique();
        let a = SponsoredAccounts::derive(&program, &[1u8; 32]);
        let b = SponsoredAccounts::derive(&program, &[2u8; 32]);
        assert_ne!(a.used_nonce, b.used_nonce);
        assert_eq!(a.state, b.state);
        assert_eq!(a.rent_fund, b.rent_fund);
    }

    #[test]
    fn test_memo_payload_is_hex_text() {
        let ix = memo(&hex!("1dc0deabcd73c0de"));
        assert_eq!(ix.program_id, MEMO_PROGRAM_ID);
        assert_eq!(ix.data, b"1dc0deabcd73c0de".to_vec());
        assert!(ix.accounts.is_empty());
    }
}
