//! # MU$IK Rust SDK
//!
//! A Rust SDK for registering music assets with the MU$IK on-chain program.
//!
//! ## Modules
//!
//! - [`program`]: Wire encoding, instruction builders, account decoding
//! - [`transaction`]: Transaction assembly and wallet signature verification
//! - [`ledger`]: Ledger RPC seam, submission and confirmation
//! - [`client`]: The end-to-end registration flow
//!
//! Plus the seams for external capabilities:
//! - [`wallet`]: Wallet signing
//! - [`pinning`]: Content pinning (Pinata)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use musik_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MusicNftClient::connect(ClientConfig::default());
//!     let wallet = KeypairWallet::new(Keypair::new());
//!
//!     let metadata = AssetMetadataBuilder::new()
//!         .title("Song")
//!         .artist("Band")
//!         .content_hash("Qm123")
//!         .certificate_hash("Qm456")
//!         .build()?;
//!
//!     let created = client.create_asset(&wallet, &metadata).await?;
//!     println!("Asset {} in slot {}", created.asset, created.confirmation.slot);
//!
//!     client.mint(&wallet, &created.asset).await?;
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// On-chain program interaction module.
/// Encoding, instructions and account layouts of the music asset program.
pub mod program;

/// Transaction assembly.
pub mod transaction;

/// Ledger access, submission and confirmation.
pub mod ledger;

/// End-to-end client.
pub mod client;

/// Client configuration.
pub mod config;

/// Error types shared by every module.
pub mod error;

/// Network URL constants.
pub mod network;

/// Content pinning service.
pub mod pinning;

/// Wallet signing capability.
pub mod wallet;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use musik_sdk::prelude::*;
/// ```
pub mod prelude {
    // Program module exports
    pub use crate::program::{
        // Encoding
        decode, encode, encode_text, FieldValue, Operation,
        // Instructions
        build_initialize_ix, build_mint_ix, build_register_copyright_ix,
        build_transfer_ownership_ix, create_asset_account,
        // Types
        AssetMetadata, AssetMetadataBuilder, AssetStatus, EphemeralAccount, MusicAsset,
        MusicProgramError,
        // Constants
        PROGRAM_ID,
    };

    // Errors
    pub use crate::error::{Recovery, SdkError, SdkResult};

    // Transaction assembly
    pub use crate::transaction::{assemble, FreshnessToken, TransactionDraft};

    // Ledger
    pub use crate::ledger::{Commitment, ConfirmationResult, LedgerRpc, SubmissionResult};
    #[cfg(feature = "solana-rpc")]
    pub use crate::ledger::SolanaLedger;

    // Client
    pub use crate::client::{AssetUpload, CreatedAsset, FileUpload, MusicNftClient};
    pub use crate::config::{ClientConfig, ConfirmConfig};

    // Capabilities
    pub use crate::pinning::PinningService;
    #[cfg(feature = "http")]
    pub use crate::pinning::PinataClient;
    pub use crate::wallet::{KeypairWallet, WalletSigner};

    // Network constants
    pub use crate::network::{DEFAULT_RPC_URL, DEVNET_RPC_URL, MAINNET_RPC_URL};

    pub use solana_keypair::Keypair;
    pub use solana_pubkey::Pubkey;
    pub use solana_signer::Signer;
}
