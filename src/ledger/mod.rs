//! Ledger access: the RPC seam, submission and confirmation.
//!
//! [`LedgerRpc`] is the only thing the rest of the SDK knows about the ledger
//! endpoint. [`SolanaLedger`] implements it over the nonblocking Solana RPC
//! client; tests substitute in-memory doubles.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;
use solana_signature::Signature;

use crate::error::{SdkError, SdkResult};
use crate::transaction::FreshnessToken;

#[cfg(feature = "solana-rpc")]
pub mod solana;
pub mod submission;

#[cfg(feature = "solana-rpc")]
pub use solana::SolanaLedger;
pub use submission::{confirm, submit, ConfirmationResult, SubmissionResult};

/// Degree of settlement certainty, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(SdkError::Config(format!("unknown commitment level `{}`", other))),
        }
    }
}

/// Status of a submitted transaction as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureState {
    /// Slot the transaction landed in
    pub slot: u64,
    /// Highest commitment reached so far
    pub commitment: Commitment,
    /// Ledger-supplied failure reason, if the transaction failed
    pub error: Option<String>,
}

impl SignatureState {
    /// Whether the requested level has been reached.
    pub fn satisfies(&self, requested: Commitment) -> bool {
        self.commitment >= requested
    }
}

/// Request/response access to a ledger endpoint.
///
/// Implementations hold only connection configuration so one instance can be
/// shared by concurrent flows.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch a fresh blockhash. Call immediately before assembling.
    async fn latest_blockhash(&self) -> SdkResult<FreshnessToken>;

    /// Transmit fully-signed transaction bytes. Must not retry.
    async fn send_raw_transaction(&self, bytes: &[u8]) -> SdkResult<Signature>;

    /// Look up a transaction's status; `None` while the ledger has not seen it.
    async fn signature_status(&self, signature: &Signature) -> SdkResult<Option<SignatureState>>;

    /// Raw account data; `None` if the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>>;
}
