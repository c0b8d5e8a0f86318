//! [`LedgerRpc`] over the nonblocking Solana RPC client.

use std::str::FromStr;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::RpcRequest;
use solana_commitment_config::CommitmentConfig;
use solana_pubkey::Pubkey;
use solana_signature::Signature;

use super::{Commitment, LedgerRpc, SignatureState};
use crate::error::{SdkError, SdkResult};
use crate::transaction::FreshnessToken;

impl Commitment {
    /// Equivalent RPC commitment config.
    pub fn to_config(self) -> CommitmentConfig {
        match self {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

/// Ledger endpoint reached through JSON-RPC.
pub struct SolanaLedger {
    /// RPC client for Solana
    pub rpc_client: RpcClient,
    /// Commitment used for blockhash, preflight and account reads
    pub commitment: Commitment,
}

impl SolanaLedger {
    /// Connect to `rpc_url` at `commitment`.
    pub fn new(rpc_url: &str, commitment: Commitment) -> Self {
        Self {
            rpc_client: RpcClient::new_with_commitment(rpc_url.to_string(), commitment.to_config()),
            commitment,
        }
    }

    /// Wrap an existing RpcClient.
    pub fn from_rpc_client(rpc_client: RpcClient) -> Self {
        let commitment = match rpc_client.commitment() {
            c if c.is_finalized() => Commitment::Finalized,
            c if c.is_confirmed() => Commitment::Confirmed,
            _ => Commitment::Processed,
        };
        Self {
            rpc_client,
            commitment,
        }
    }
}

/// Program rejections carry a transaction error; everything else is transport.
fn map_send_error(err: ClientError) -> SdkError {
    match err.get_transaction_error() {
        Some(tx_err) => SdkError::ProgramError(tx_err.to_string()),
        None => SdkError::NetworkFailure(err.to_string()),
    }
}

#[async_trait]
impl LedgerRpc for SolanaLedger {
    async fn latest_blockhash(&self) -> SdkResult<FreshnessToken> {
        let (blockhash, last_valid_block_height) = self
            .rpc_client
            .get_latest_blockhash_with_commitment(self.commitment.to_config())
            .await
            .map_err(|e| SdkError::NetworkFailure(format!("latest blockhash: {}", e)))?;
        Ok(FreshnessToken::new(blockhash, last_valid_block_height))
    }

    async fn send_raw_transaction(&self, bytes: &[u8]) -> SdkResult<Signature> {
        let encoded = BASE64.encode(bytes);
        let params = json!([
            encoded,
            {
                "encoding": "base64",
                "preflightCommitment": self.commitment.as_str(),
                "maxRetries": 0,
            }
        ]);

        let response: String = self
            .rpc_client
            .send(RpcRequest::SendTransaction, params)
            .await
            .map_err(map_send_error)?;

        Signature::from_str(&response)
            .map_err(|e| SdkError::NetworkFailure(format!("malformed signature in response: {}", e)))
    }

    async fn signature_status(&self, signature: &Signature) -> SdkResult<Option<SignatureState>> {
        let response = self
            .rpc_client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|e| SdkError::NetworkFailure(format!("signature status: {}", e)))?;

        let status = match response.value.into_iter().next().flatten() {
            Some(status) => status,
            None => return Ok(None),
        };

        let commitment = if status.satisfies_commitment(CommitmentConfig::finalized()) {
            Commitment::Finalized
        } else if status.satisfies_commitment(CommitmentConfig::confirmed()) {
            Commitment::Confirmed
        } else {
            Commitment::Processed
        };

        Ok(Some(SignatureState {
            slot: status.slot,
            commitment,
            error: status.err.map(|e| e.to_string()),
        }))
    }

    async fn account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.commitment.to_config())
            .await
            .map_err(|e| SdkError::NetworkFailure(format!("account {}: {}", address, e)))?;
        Ok(response.value.map(|account| account.data))
    }
}
