//! Unified SDK error types.

use solana_pubkey::Pubkey;
use solana_signature::Signature;
use thiserror::Error;

use crate::program::program_error::MusicProgramError;

/// Top-level SDK error.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Required field, file or identity was not supplied by the caller
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A field is too long for its 4-byte length prefix
    #[error("Encoding overflow: field `{field}` is {len} bytes (max {max})", max = u32::MAX)]
    EncodingOverflow { field: String, len: usize },

    /// Field list does not match the operation's schema
    #[error("Schema mismatch for {operation}: {reason}")]
    SchemaMismatch {
        operation: &'static str,
        reason: String,
    },

    /// Payload bytes could not be decoded
    #[error("Invalid instruction data: {0}")]
    InvalidInstructionData(String),

    /// A required signer is missing or its signature is not valid
    #[error("Incomplete draft: {0}")]
    IncompleteDraft(String),

    /// Serialized transaction exceeds the packet limit
    #[error("Transaction too large: {size} bytes (max {max})")]
    TransactionTooLarge { size: usize, max: usize },

    /// The wallet declined to sign
    #[error("Signing rejected: {0}")]
    SigningRejected(String),

    /// Endpoint unreachable or malformed response
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The remote program rejected the transaction (ledger-supplied reason)
    #[error("Program error: {0}")]
    ProgramError(String),

    /// No settlement observed within the configured window
    #[error("Confirmation timeout: {signature} not settled after {waited_ms}ms")]
    ConfirmationTimeout { signature: Signature, waited_ms: u64 },

    /// Status queries kept failing after the transaction was sent
    #[error("Confirmation unavailable: status of {signature} unknown: {reason}")]
    ConfirmationUnavailable { signature: Signature, reason: String },

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Invalid data length
    #[error("Invalid data length: expected {expected}, got {actual}")]
    InvalidDataLength { expected: usize, actual: usize },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Pinning service rejected an upload
    #[error("Pinning error: {0}")]
    Pinning(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// What a caller should do after a failed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Caller-side problem; fix the input before trying again.
    FixInput,
    /// Transient; restart the whole flow with a fresh freshness token.
    /// Never resubmit the same signed bytes.
    RestartFlow,
    /// Outcome unknown; re-query confirmation by signature instead of resubmitting.
    RequeryConfirmation,
    /// Terminal.
    None,
}

impl SdkError {
    /// Classify the error for retry decisions.
    pub fn recovery(&self) -> Recovery {
        match self {
            SdkError::MissingInput(_)
            | SdkError::EncodingOverflow { .. }
            | SdkError::SchemaMismatch { .. }
            | SdkError::IncompleteDraft(_)
            | SdkError::TransactionTooLarge { .. }
            | SdkError::Config(_) => Recovery::FixInput,
            SdkError::NetworkFailure(_) => Recovery::RestartFlow,
            SdkError::ConfirmationTimeout { .. } | SdkError::ConfirmationUnavailable { .. } => {
                Recovery::RequeryConfirmation
            }
            SdkError::InvalidInstructionData(_)
            | SdkError::SigningRejected(_)
            | SdkError::ProgramError(_)
            | SdkError::AccountNotFound(_)
            | SdkError::InvalidDataLength { .. }
            | SdkError::Serialization(_)
            | SdkError::Pinning(_) => Recovery::None,
        }
    }

    /// Whether restarting the flow may succeed.
    pub fn is_transient(&self) -> bool {
        self.recovery() == Recovery::RestartFlow
    }

    /// Remote program error code, if the ledger reported a custom program error.
    pub fn program_error_code(&self) -> Option<MusicProgramError> {
        match self {
            SdkError::ProgramError(reason) => MusicProgramError::from_reason(reason),
            _ => None,
        }
    }

    /// One human-readable line suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            SdkError::MissingInput(what) => format!("Please provide {}.", what),
            SdkError::EncodingOverflow { field, .. } => {
                format!("The {} is too long to register.", field)
            }
            SdkError::SchemaMismatch { .. } | SdkError::InvalidInstructionData(_) => {
                "The request could not be encoded for the music program.".to_string()
            }
            SdkError::IncompleteDraft(_) => {
                "The transaction is missing a required signature.".to_string()
            }
            SdkError::TransactionTooLarge { .. } => {
                "The asset details are too long to fit in one transaction.".to_string()
            }
            SdkError::SigningRejected(_) => "The request was cancelled in your wallet.".to_string(),
            SdkError::NetworkFailure(_) => {
                "The network is unavailable right now. Please try again.".to_string()
            }
            SdkError::ProgramError(reason) => match self.program_error_code() {
                Some(code) => format!("The music program rejected the request: {}.", code),
                None => format!("The music program rejected the request: {}", reason),
            },
            SdkError::ConfirmationTimeout { signature, .. } => format!(
                "Transaction {} was sent but is not confirmed yet. Check its status before retrying.",
                signature
            ),
            SdkError::ConfirmationUnavailable { signature, .. } => format!(
                "Transaction {} was sent but its status could not be checked. Check again before retrying.",
                signature
            ),
            SdkError::AccountNotFound(address) => format!("No music asset found at {}.", address),
            SdkError::InvalidDataLength { .. } | SdkError::Serialization(_) => {
                "The asset record could not be read.".to_string()
            }
            SdkError::Pinning(_) => "The file upload failed.".to_string(),
            SdkError::Config(reason) => format!("Invalid configuration: {}", reason),
        }
    }
}
