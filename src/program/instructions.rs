//! Instruction builders for all MU$IK instructions.
//!
//! This module provides functions to build transaction instructions for
//! interacting with the MU$IK program. Account order is part of the program's
//! addressing convention and depends only on the operation.

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::error::SdkResult;
use crate::program::constants::SYSTEM_PROGRAM_ID;
use crate::program::encoding::{encode, FieldValue, Operation};
use crate::program::types::{AssetMetadata, EphemeralAccount};

// ============================================================================
// Helper Functions
// ============================================================================

/// Create an account meta for a signer+writable account.
fn signer_mut(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, true)
}

/// Create an account meta for a writable account.
fn writable(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, false)
}

/// Create an account meta for a read-only account.
fn readonly(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, false)
}

/// Generate the identity for a new asset record.
///
/// The factory never generates identities anywhere else.
pub fn create_asset_account() -> EphemeralAccount {
    EphemeralAccount::generate()
}

// ============================================================================
// Instruction Builders
// ============================================================================

/// Build Initialize instruction.
///
/// Creates the asset record and stores its metadata.
///
/// Accounts:
/// 0. payer (signer, mut) - Pays rent, becomes the creator
/// 1. asset (signer, mut) - New asset record
/// 2. system_program (readonly)
pub fn build_initialize_ix(
    payer: &Pubkey,
    asset: &Pubkey,
    metadata: &AssetMetadata,
    program_id: &Pubkey,
) -> SdkResult<Instruction> {
    let keys = vec![
        signer_mut(*payer),
        signer_mut(*asset),
        readonly(SYSTEM_PROGRAM_ID),
    ];

    // Data: [0, title, artist, content_hash, certificate_hash]
    let data = encode(Operation::Initialize, &metadata.to_fields())?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: keys,
        data,
    })
}

/// Build Mint instruction.
///
/// Accounts:
/// 0. payer (signer, mut) - Must be the creator
/// 1. asset (mut)
pub fn build_mint_ix(payer: &Pubkey, asset: &Pubkey, program_id: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![signer_mut(*payer), writable(*asset)],
        data: vec![Operation::Mint.discriminant()],
    }
}

/// Build RegisterCopyright instruction.
///
/// Accounts:
/// 0. payer (signer, mut) - Must be the creator
/// 1. asset (mut) - Must be minted
pub fn build_register_copyright_ix(
    payer: &Pubkey,
    asset: &Pubkey,
    program_id: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![signer_mut(*payer), writable(*asset)],
        data: vec![Operation::RegisterCopyright.discriminant()],
    }
}

/// Build TransferOwnership instruction.
///
/// Accounts:
/// 0. owner (signer, mut) - Current owner
/// 1. asset (mut) - Must be minted
pub fn build_transfer_ownership_ix(
    owner: &Pubkey,
    asset: &Pubkey,
    new_owner: &Pubkey,
    program_id: &Pubkey,
) -> SdkResult<Instruction> {
    // Data: [3, new_owner (32)]
    let data = encode(Operation::TransferOwnership, &[FieldValue::Pubkey(*new_owner)])?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![signer_mut(*owner), writable(*asset)],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::constants::PROGRAM_ID;
    use crate::program::encoding::decode;

    fn test_program_id() -> Pubkey {
        *PROGRAM_ID
    }

    fn account_flags(ix: &Instruction) -> Vec<(bool, bool)> {
        ix.accounts
            .iter()
            .map(|meta| (meta.is_signer, meta.is_writable))
            .collect()
    }

    #[test]
    fn test_build_initialize_ix() {
        let payer = Pubkey::new_unique();
        let asset = Pubkey::new_unique();
        let metadata = AssetMetadata::new("Song", "Band", "Qm123", "Qm456");
        let program_id = test_program_id();

        let ix = build_initialize_ix(&payer, &asset, &metadata, &program_id).unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert_eq!(ix.accounts[1].pubkey, asset);
        assert_eq!(ix.accounts[2].pubkey, SYSTEM_PROGRAM_ID);
        assert_eq!(
            account_flags(&ix),
            vec![(true, true), (true, true), (false, false)]
        );
        assert_eq!(ix.data.len(), 35);
        assert_eq!(ix.data[0], 0);
        assert_eq!(&ix.data[1..5], &[4, 0, 0, 0]);
        assert_eq!(&ix.data[5..9], b"Song");
    }

    #[test]
    fn test_initialize_payload_decodes_to_metadata() {
        let metadata = AssetMetadata::new("Title ♪", "Artist", "QmContent", "QmCert");
        let ix = build_initialize_ix(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &metadata,
            &test_program_id(),
        )
        .unwrap();

        let (op, fields) = decode(&ix.data).unwrap();
        assert_eq!(op, Operation::Initialize);
        assert_eq!(fields, metadata.to_fields());
    }

    #[test]
    fn test_build_mint_ix() {
        let payer = Pubkey::new_unique();
        let asset = Pubkey::new_unique();
        let program_id = test_program_id();

        let ix = build_mint_ix(&payer, &asset, &program_id);

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert_eq!(ix.accounts[1].pubkey, asset);
        assert_eq!(account_flags(&ix), vec![(true, true), (false, true)]);
        assert_eq!(ix.data, vec![0x01]);
    }

    #[test]
    fn test_build_register_copyright_ix() {
        let payer = Pubkey::new_unique();
        let asset = Pubkey::new_unique();

        let ix = build_register_copyright_ix(&payer, &asset, &test_program_id());

        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(account_flags(&ix), vec![(true, true), (false, true)]);
        assert_eq!(ix.data, vec![0x02]);
    }

    #[test]
    fn test_build_transfer_ownership_ix() {
        let owner = Pubkey::new_unique();
        let asset = Pubkey::new_unique();
        let new_owner = Pubkey::new_unique();

        let ix =
            build_transfer_ownership_ix(&owner, &asset, &new_owner, &test_program_id()).unwrap();

        assert_eq!(account_flags(&ix), vec![(true, true), (false, true)]);
        assert_eq!(ix.data.len(), 33);
        assert_eq!(ix.data[0], 3);
        assert_eq!(&ix.data[1..], new_owner.as_ref());
    }

    #[test]
    fn test_account_order_independent_of_identities() {
        let program_id = test_program_id();
        let metadata = AssetMetadata::new("a", "b", "c", "d");

        let first = build_initialize_ix(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &metadata,
            &program_id,
        )
        .unwrap();
        let second = build_initialize_ix(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &metadata,
            &program_id,
        )
        .unwrap();
        assert_eq!(account_flags(&first), account_flags(&second));
        assert_eq!(first.data, second.data);

        let mint_a = build_mint_ix(&Pubkey::new_unique(), &Pubkey::new_unique(), &program_id);
        let mint_b = build_mint_ix(&Pubkey::new_unique(), &Pubkey::new_unique(), &program_id);
        assert_eq!(account_flags(&mint_a), account_flags(&mint_b));
        assert_eq!(mint_a.data, mint_b.data);
    }

    #[test]
    fn test_builders_are_deterministic() {
        let payer = Pubkey::new_unique();
        let asset = Pubkey::new_unique();
        let metadata = AssetMetadata::new("Song", "Band", "Qm123", "Qm456");
        let program_id = test_program_id();

        let a = build_initialize_ix(&payer, &asset, &metadata, &program_id).unwrap();
        let b = build_initialize_ix(&payer, &asset, &metadata, &program_id).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_create_asset_account() {
        let a = create_asset_account();
        let b = create_asset_account();
        assert_ne!(a.pubkey(), b.pubkey());
    }
}
