//! Wallet signing seam.
//!
//! A wallet receives a partially-signed transaction and returns it with its
//! fee-payer signature added. The SDK never sees the wallet's secret key.

use async_trait::async_trait;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::{Signer, SignerError};
use solana_transaction::Transaction;

use crate::error::{SdkError, SdkResult};

/// External signer holding the user's identity key.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Public key of the connected wallet, `None` when disconnected.
    fn identity(&self) -> Option<Pubkey>;

    /// Add the wallet's signature. Must not alter the message.
    ///
    /// A user refusal is reported as `SigningRejected`.
    async fn sign_transaction(&self, transaction: Transaction) -> SdkResult<Transaction>;
}

/// Wallet backed by a local keypair. Used by scripts, demos and tests.
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Load from a base58-encoded 64-byte secret key.
    pub fn from_base58(secret: &str) -> SdkResult<Self> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| SdkError::Config(format!("invalid base58 keypair: {}", e)))?;
        let keypair = Keypair::try_from(bytes.as_slice())
            .map_err(|e| SdkError::Config(format!("invalid keypair bytes: {}", e)))?;
        Ok(Self { keypair })
    }

    /// Load from the JSON byte-array format written by `solana-keygen`.
    pub fn from_json_bytes(json: &str) -> SdkResult<Self> {
        let bytes: Vec<u8> = serde_json::from_str(json)
            .map_err(|e| SdkError::Config(format!("invalid keypair file: {}", e)))?;
        let keypair = Keypair::try_from(bytes.as_slice())
            .map_err(|e| SdkError::Config(format!("invalid keypair bytes: {}", e)))?;
        Ok(Self { keypair })
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

#[async_trait]
impl WalletSigner for KeypairWallet {
    fn identity(&self) -> Option<Pubkey> {
        Some(self.keypair.pubkey())
    }

    async fn sign_transaction(&self, mut transaction: Transaction) -> SdkResult<Transaction> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| match e {
                // The draft does not name this key as a signer
                SignerError::KeypairPubkeyMismatch => SdkError::IncompleteDraft(format!(
                    "wallet key {} is not a required signer",
                    self.keypair.pubkey()
                )),
                other => SdkError::SigningRejected(other.to_string()),
            })?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_hash::Hash;
    use solana_instruction::{AccountMeta, Instruction};

    fn unsigned_tx(payer: &Pubkey) -> Transaction {
        let ix = Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[1],
            vec![AccountMeta::new(*payer, true)],
        );
        let mut tx = Transaction::new_with_payer(&[ix], Some(payer));
        tx.message.recent_blockhash = Hash::new_from_array([3u8; 32]);
        tx
    }

    #[tokio::test]
    async fn test_keypair_wallet_signs_fee_payer_slot() {
        let wallet = KeypairWallet::new(Keypair::new());
        let payer = wallet.identity().unwrap();
        let tx = unsigned_tx(&payer);
        let message = tx.message_data();

        let signed = wallet.sign_transaction(tx).await.unwrap();

        assert_eq!(signed.message_data(), message);
        assert!(signed.signatures[0].verify(payer.as_ref(), &message));
    }

    #[tokio::test]
    async fn test_keypair_wallet_rejects_foreign_draft() {
        let wallet = KeypairWallet::new(Keypair::new());
        let tx = unsigned_tx(&Pubkey::new_unique());

        let err = wallet.sign_transaction(tx).await.unwrap_err();
        assert!(matches!(err, SdkError::IncompleteDraft(_)));
        assert_eq!(err.recovery(), crate::error::Recovery::FixInput);
    }

    #[test]
    fn test_from_base58_roundtrip() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();
        let wallet = KeypairWallet::from_base58(&encoded).unwrap();
        assert_eq!(wallet.identity(), Some(keypair.pubkey()));
    }

    #[test]
    fn test_from_json_bytes() {
        let keypair = Keypair::new();
        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        let wallet = KeypairWallet::from_json_bytes(&json).unwrap();
        assert_eq!(wallet.identity(), Some(keypair.pubkey()));
    }

    #[test]
    fn test_from_base58_invalid() {
        assert!(matches!(
            KeypairWallet::from_base58("0OIl"),
            Err(SdkError::Config(_))
        ));
    }
}
