//! Submission and confirmation of signed transactions.
//!
//! Submission transmits bytes exactly once. Confirmation polls the ledger
//! until the requested commitment is reached, the transaction is reported
//! failed, or the deadline passes. A timeout never means failure: the
//! transaction may still land, so callers re-query with the same signature.

use std::time::{Duration, Instant};

use futures_timer::Delay;
use solana_signature::Signature;

use super::{Commitment, LedgerRpc};
use crate::config::ConfirmConfig;
use crate::error::{SdkError, SdkResult};

/// Outcome of a successful transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionResult {
    pub signature: Signature,
}

/// Outcome of a successful confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationResult {
    pub signature: Signature,
    /// Commitment actually observed; at least the requested level
    pub commitment: Commitment,
    pub slot: u64,
    /// Number of status queries issued
    pub polls: u32,
}

/// Transmit fully-signed transaction bytes.
///
/// Ledger rejection is reported as `ProgramError`, transport trouble as
/// `NetworkFailure`. No retry happens here.
pub async fn submit<L>(ledger: &L, signed: &[u8]) -> SdkResult<SubmissionResult>
where
    L: LedgerRpc + ?Sized,
{
    if signed.is_empty() {
        return Err(SdkError::MissingInput("signed transaction bytes".to_string()));
    }

    let signature = ledger.send_raw_transaction(signed).await?;
    tracing::info!(signature = %signature, bytes = signed.len(), "Transaction submitted");

    Ok(SubmissionResult { signature })
}

/// Wait until `signature` reaches `commitment`.
///
/// Once `max_poll_errors` consecutive status queries fail the wait ends with
/// `ConfirmationUnavailable`, which carries the signature for a later re-query.
pub async fn confirm<L>(
    ledger: &L,
    signature: &Signature,
    commitment: Commitment,
    config: &ConfirmConfig,
) -> SdkResult<ConfirmationResult>
where
    L: LedgerRpc + ?Sized,
{
    let started = Instant::now();
    let mut polls: u32 = 0;
    let mut consecutive_errors: u32 = 0;

    loop {
        polls += 1;

        match ledger.signature_status(signature).await {
            Ok(Some(state)) => {
                consecutive_errors = 0;

                if let Some(reason) = state.error {
                    tracing::debug!(signature = %signature, reason = %reason, "Transaction failed on ledger");
                    return Err(SdkError::ProgramError(reason));
                }

                if state.satisfies(commitment) {
                    tracing::info!(
                        signature = %signature,
                        commitment = %state.commitment,
                        slot = state.slot,
                        polls,
                        "Transaction confirmed"
                    );
                    return Ok(ConfirmationResult {
                        signature: *signature,
                        commitment: state.commitment,
                        slot: state.slot,
                        polls,
                    });
                }
            }
            Ok(None) => {
                consecutive_errors = 0;
            }
            Err(e) => {
                consecutive_errors += 1;
                if consecutive_errors > config.max_poll_errors {
                    // Already sent: the outcome is unknown, not failed
                    tracing::warn!(
                        signature = %signature,
                        consecutive_errors,
                        error = %e,
                        "Giving up on status queries"
                    );
                    return Err(SdkError::ConfirmationUnavailable {
                        signature: *signature,
                        reason: e.to_string(),
                    });
                }
                tracing::warn!(
                    signature = %signature,
                    consecutive_errors,
                    max_poll_errors = config.max_poll_errors,
                    error = %e,
                    "Status query failed"
                );
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= config.timeout {
            tracing::warn!(
                signature = %signature,
                waited_ms = elapsed.as_millis() as u64,
                "Confirmation timed out"
            );
            return Err(SdkError::ConfirmationTimeout {
                signature: *signature,
                waited_ms: elapsed.as_millis() as u64,
            });
        }

        let remaining = config.timeout - elapsed;
        Delay::new(config.poll_interval.min(remaining).max(Duration::from_millis(1))).await;
    }
}
