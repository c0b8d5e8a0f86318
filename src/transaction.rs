//! Transaction assembly.
//!
//! Composes instructions into one atomic transaction, attaches the fee payer
//! and freshness token, pre-signs with ephemeral co-signers and checks the
//! signature set the wallet hands back. Instruction payloads are never
//! inspected here.

use solana_hash::Hash;
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::Transaction;

use crate::error::{SdkError, SdkResult};
use crate::program::constants::PACKET_DATA_SIZE;

/// Short-lived recent blockhash that must accompany a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessToken {
    pub blockhash: Hash,
    /// Last block height at which the blockhash is accepted
    pub last_valid_block_height: u64,
}

impl FreshnessToken {
    pub fn new(blockhash: Hash, last_valid_block_height: u64) -> Self {
        Self {
            blockhash,
            last_valid_block_height,
        }
    }
}

/// A transaction awaiting the wallet's signature.
///
/// Valid for one submission attempt only. Consumed by
/// [`TransactionDraft::into_transaction`] when handed to the wallet.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    transaction: Transaction,
    freshness: FreshnessToken,
    pending_signers: Vec<Pubkey>,
}

impl TransactionDraft {
    /// Fee payer (first account key).
    pub fn fee_payer(&self) -> Pubkey {
        self.transaction.message.account_keys[0]
    }

    /// Freshness token the draft was assembled with.
    pub fn freshness(&self) -> &FreshnessToken {
        &self.freshness
    }

    /// Required signers whose signature is still missing.
    pub fn pending_signers(&self) -> &[Pubkey] {
        &self.pending_signers
    }

    /// Every signer the compiled message requires, fee payer first.
    pub fn required_signers(&self) -> &[Pubkey] {
        required_signers(&self.transaction)
    }

    /// Serialized message bytes (what every signer signs).
    pub fn message_data(&self) -> Vec<u8> {
        self.transaction.message_data()
    }

    /// Borrow the partially-signed transaction.
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Hand the draft over for the remaining signatures.
    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }
}

fn required_signers(tx: &Transaction) -> &[Pubkey] {
    let count = tx.message.header.num_required_signatures as usize;
    &tx.message.account_keys[..count.min(tx.message.account_keys.len())]
}

/// Assemble a draft from ordered instructions.
///
/// `fee_payer` is the wallet's identity; it and the `co_signers` must cover
/// every signer the instructions declare, otherwise `IncompleteDraft`. Co-signers
/// that no instruction requires are ignored.
pub fn assemble(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    freshness: FreshnessToken,
    co_signers: &[&dyn Signer],
) -> SdkResult<TransactionDraft> {
    if instructions.is_empty() {
        return Err(SdkError::MissingInput("at least one instruction".to_string()));
    }

    // Message compilation keeps instruction order
    let mut transaction = Transaction::new_with_payer(instructions, Some(fee_payer));
    transaction.message.recent_blockhash = freshness.blockhash;

    let required = required_signers(&transaction).to_vec();

    let missing: Vec<Pubkey> = required
        .iter()
        .filter(|key| *key != fee_payer && !co_signers.iter().any(|s| s.pubkey() == **key))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(SdkError::IncompleteDraft(format!(
            "no signer for {}",
            join_keys(&missing)
        )));
    }

    let signing: Vec<&dyn Signer> = co_signers
        .iter()
        .copied()
        .filter(|s| {
            let key = s.pubkey();
            key != *fee_payer && required.contains(&key)
        })
        .collect();

    if signing.len() < co_signers.len() {
        tracing::debug!(
            ignored = co_signers.len() - signing.len(),
            "Ignoring co-signers not required by any instruction"
        );
    }

    if !signing.is_empty() {
        transaction
            .try_partial_sign(&signing, freshness.blockhash)
            .map_err(|e| SdkError::IncompleteDraft(format!("co-signer failed: {}", e)))?;
    }

    // Placeholder signatures have the same size as real ones
    let size = serialized_size(&transaction)?;
    if size > PACKET_DATA_SIZE {
        return Err(SdkError::TransactionTooLarge {
            size,
            max: PACKET_DATA_SIZE,
        });
    }

    let pending_signers = required
        .iter()
        .zip(&transaction.signatures)
        .filter(|(_, sig)| **sig == Signature::default())
        .map(|(key, _)| *key)
        .collect();

    tracing::debug!(
        instructions = instructions.len(),
        required_signers = required.len(),
        co_signed = signing.len(),
        size,
        "Assembled transaction draft"
    );

    Ok(TransactionDraft {
        transaction,
        freshness,
        pending_signers,
    })
}

/// Check the transaction a wallet returned against the draft it was given.
///
/// The message must be byte-identical and every required signer must have a
/// valid signature over it.
pub fn verify_wallet_signatures(expected_message: &[u8], signed: &Transaction) -> SdkResult<()> {
    let message = signed.message_data();
    if message != expected_message {
        return Err(SdkError::IncompleteDraft(
            "wallet returned a different message than it was asked to sign".to_string(),
        ));
    }

    let required = required_signers(signed);
    if signed.signatures.len() != required.len() {
        return Err(SdkError::IncompleteDraft(format!(
            "expected {} signatures, wallet returned {}",
            required.len(),
            signed.signatures.len()
        )));
    }

    let invalid: Vec<Pubkey> = required
        .iter()
        .zip(&signed.signatures)
        .filter(|(key, sig)| !sig.verify(key.as_ref(), &message))
        .map(|(key, _)| *key)
        .collect();
    if !invalid.is_empty() {
        return Err(SdkError::IncompleteDraft(format!(
            "missing or invalid signature for {}",
            join_keys(&invalid)
        )));
    }

    Ok(())
}

/// Serialize a fully-signed transaction to wire bytes.
pub fn serialize_transaction(tx: &Transaction) -> SdkResult<Vec<u8>> {
    bincode::serialize(tx).map_err(|e| SdkError::Serialization(e.to_string()))
}

fn serialized_size(tx: &Transaction) -> SdkResult<usize> {
    bincode::serialized_size(tx)
        .map(|size| size as usize)
        .map_err(|e| SdkError::Serialization(e.to_string()))
}

fn join_keys(keys: &[Pubkey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{
        build_initialize_ix, build_mint_ix, build_register_copyright_ix, AssetMetadata,
        EphemeralAccount, PROGRAM_ID,
    };
    use solana_keypair::Keypair;

    fn token() -> FreshnessToken {
        FreshnessToken::new(Hash::new_from_array([7u8; 32]), 100)
    }

    fn initialize_ix(payer: &Pubkey, asset: &Pubkey) -> Instruction {
        let metadata = AssetMetadata::new("Song", "Band", "Qm123", "Qm456");
        build_initialize_ix(payer, asset, &metadata, &PROGRAM_ID).unwrap()
    }

    #[test]
    fn test_assemble_presigns_ephemeral_account() {
        let wallet = Keypair::new();
        let asset = EphemeralAccount::generate();
        let ix = initialize_ix(&wallet.pubkey(), &asset.pubkey());
        let freshness = token();

        let draft = assemble(&[ix], &wallet.pubkey(), freshness, &[asset.signer()]).unwrap();

        assert_eq!(draft.fee_payer(), wallet.pubkey());
        assert_eq!(draft.freshness(), &freshness);
        assert_eq!(draft.transaction().message.recent_blockhash, freshness.blockhash);
        assert_eq!(draft.required_signers(), &[wallet.pubkey(), asset.pubkey()]);
        assert_eq!(draft.pending_signers(), &[wallet.pubkey()]);

        let tx = draft.transaction();
        let message = tx.message_data();
        assert_eq!(tx.signatures[0], Signature::default());
        assert!(tx.signatures[1].verify(asset.pubkey().as_ref(), &message));
    }

    #[test]
    fn test_assemble_without_ephemeral_signer_is_incomplete() {
        let wallet = Keypair::new();
        let asset = EphemeralAccount::generate();
        let ix = initialize_ix(&wallet.pubkey(), &asset.pubkey());

        let err = assemble(&[ix], &wallet.pubkey(), token(), &[]).unwrap_err();
        match err {
            SdkError::IncompleteDraft(reason) => {
                assert!(reason.contains(&asset.pubkey().to_string()))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_assemble_rejects_foreign_payer_signer() {
        // Mint signed by someone who is neither the fee payer nor a co-signer
        let wallet = Keypair::new();
        let creator = Pubkey::new_unique();
        let ix = build_mint_ix(&creator, &Pubkey::new_unique(), &PROGRAM_ID);

        let result = assemble(&[ix], &wallet.pubkey(), token(), &[]);
        assert!(matches!(result, Err(SdkError::IncompleteDraft(_))));
    }

    #[test]
    fn test_assemble_requires_instructions() {
        let wallet = Pubkey::new_unique();
        let result = assemble(&[], &wallet, token(), &[]);
        assert!(matches!(result, Err(SdkError::MissingInput(_))));
    }

    #[test]
    fn test_assemble_preserves_instruction_order() {
        let wallet = Keypair::new();
        let asset = EphemeralAccount::generate();
        let instructions = vec![
            initialize_ix(&wallet.pubkey(), &asset.pubkey()),
            build_mint_ix(&wallet.pubkey(), &asset.pubkey(), &PROGRAM_ID),
            build_register_copyright_ix(&wallet.pubkey(), &asset.pubkey(), &PROGRAM_ID),
        ];

        let draft = assemble(&instructions, &wallet.pubkey(), token(), &[asset.signer()]).unwrap();

        let compiled = &draft.transaction().message.instructions;
        assert_eq!(compiled.len(), 3);
        assert_eq!(compiled[0].data[0], 0);
        assert_eq!(compiled[1].data, vec![1]);
        assert_eq!(compiled[2].data, vec![2]);
    }

    #[test]
    fn test_assemble_ignores_unneeded_co_signers() {
        let wallet = Keypair::new();
        let bystander = Keypair::new();
        let asset = Pubkey::new_unique();
        let ix = build_mint_ix(&wallet.pubkey(), &asset, &PROGRAM_ID);

        let draft = assemble(&[ix], &wallet.pubkey(), token(), &[&bystander]).unwrap();
        assert_eq!(draft.required_signers(), &[wallet.pubkey()]);
        assert_eq!(draft.pending_signers(), &[wallet.pubkey()]);
    }

    #[test]
    fn test_assemble_rejects_oversized_transaction() {
        let wallet = Keypair::new();
        let asset = EphemeralAccount::generate();
        let metadata = AssetMetadata::new("x".repeat(1200), "Band", "Qm123", "Qm456");
        let ix = build_initialize_ix(&wallet.pubkey(), &asset.pubkey(), &metadata, &PROGRAM_ID)
            .unwrap();

        let result = assemble(&[ix], &wallet.pubkey(), token(), &[asset.signer()]);
        assert!(matches!(
            result,
            Err(SdkError::TransactionTooLarge { max: PACKET_DATA_SIZE, .. })
        ));
    }

    #[test]
    fn test_verify_wallet_signatures_accepts_complete_set() {
        let wallet = Keypair::new();
        let asset = EphemeralAccount::generate();
        let ix = initialize_ix(&wallet.pubkey(), &asset.pubkey());
        let draft = assemble(&[ix], &wallet.pubkey(), token(), &[asset.signer()]).unwrap();

        let expected = draft.message_data();
        let blockhash = draft.freshness().blockhash;
        let mut tx = draft.into_transaction();
        tx.try_partial_sign(&[&wallet], blockhash).unwrap();

        verify_wallet_signatures(&expected, &tx).unwrap();
    }

    #[test]
    fn test_verify_wallet_signatures_detects_missing_signature() {
        let wallet = Keypair::new();
        let asset = EphemeralAccount::generate();
        let ix = initialize_ix(&wallet.pubkey(), &asset.pubkey());
        let draft = assemble(&[ix], &wallet.pubkey(), token(), &[asset.signer()]).unwrap();

        let expected = draft.message_data();
        // Wallet hands the draft back without signing
        let tx = draft.into_transaction();

        let err = verify_wallet_signatures(&expected, &tx).unwrap_err();
        match err {
            SdkError::IncompleteDraft(reason) => {
                assert!(reason.contains(&wallet.pubkey().to_string()))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_verify_wallet_signatures_detects_tampered_message() {
        let wallet = Keypair::new();
        let asset = Pubkey::new_unique();
        let ix = build_mint_ix(&wallet.pubkey(), &asset, &PROGRAM_ID);
        let draft = assemble(&[ix], &wallet.pubkey(), token(), &[]).unwrap();
        let expected = draft.message_data();

        // Wallet swaps the instruction for a different one and signs that
        let other = build_register_copyright_ix(&wallet.pubkey(), &asset, &PROGRAM_ID);
        let mut tx = Transaction::new_with_payer(&[other], Some(&wallet.pubkey()));
        let blockhash = draft.freshness().blockhash;
        tx.try_sign(&[&wallet], blockhash).unwrap();

        let result = verify_wallet_signatures(&expected, &tx);
        assert!(matches!(result, Err(SdkError::IncompleteDraft(_))));
    }

    #[test]
    fn test_serialize_transaction() {
        let wallet = Keypair::new();
        let ix = build_mint_ix(&wallet.pubkey(), &Pubkey::new_unique(), &PROGRAM_ID);
        let draft = assemble(&[ix], &wallet.pubkey(), token(), &[]).unwrap();
        let blockhash = draft.freshness().blockhash;
        let mut tx = draft.into_transaction();
        tx.try_sign(&[&wallet], blockhash).unwrap();

        let bytes = serialize_transaction(&tx).unwrap();
        let decoded: Transaction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, tx);
    }
}
