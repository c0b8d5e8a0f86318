//! Async client for registering music assets.
//!
//! [`MusicNftClient`] drives the whole flow: pin files, build instructions,
//! fetch a freshness token, assemble, obtain the wallet signature, verify it,
//! submit once, and wait for confirmation. It holds only configuration and a
//! ledger handle, so one client can serve many concurrent flows.
//!
//! # Example
//!
//! ```rust,ignore
//! use musik_sdk::prelude::*;
//!
//! let client = MusicNftClient::connect(ClientConfig::from_env()?);
//! let pinata = PinataClient::from_env()?;
//!
//! let created = client
//!     .upload_and_create_asset(&wallet, &pinata, upload)
//!     .await?;
//! client.mint(&wallet, &created.asset).await?;
//! client.register_copyright(&wallet, &created.asset).await?;
//! ```

use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use crate::ledger::{confirm, submit, ConfirmationResult, LedgerRpc};
use crate::pinning::PinningService;
use crate::program::accounts::{decode_asset, MusicAsset};
use crate::program::instructions::*;
use crate::program::types::AssetMetadata;
use crate::transaction::{assemble, serialize_transaction, verify_wallet_signatures};
use crate::wallet::WalletSigner;

#[cfg(feature = "solana-rpc")]
use crate::ledger::SolanaLedger;

/// A file to be pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Everything needed to register a new asset from raw files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUpload {
    pub title: String,
    pub artist: String,
    pub music_file: Option<FileUpload>,
    pub certificate_file: Option<FileUpload>,
}

impl AssetUpload {
    /// Reject blank fields and empty or absent files.
    pub fn validate(&self) -> SdkResult<()> {
        if self.title.trim().is_empty() {
            return Err(SdkError::MissingInput("title".to_string()));
        }
        if self.artist.trim().is_empty() {
            return Err(SdkError::MissingInput("artist".to_string()));
        }
        match &self.music_file {
            Some(file) if !file.bytes.is_empty() => {}
            _ => return Err(SdkError::MissingInput("music file".to_string())),
        }
        match &self.certificate_file {
            Some(file) if !file.bytes.is_empty() => {}
            _ => return Err(SdkError::MissingInput("certificate file".to_string())),
        }
        Ok(())
    }
}

/// Result of a successful Initialize flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedAsset {
    /// Address of the new asset record
    pub asset: Pubkey,
    pub signature: Signature,
    pub confirmation: ConfirmationResult,
}

/// Client for the MU$IK music asset program.
pub struct MusicNftClient<L: LedgerRpc> {
    /// Ledger endpoint
    pub ledger: L,
    config: ClientConfig,
}

#[cfg(feature = "solana-rpc")]
impl MusicNftClient<SolanaLedger> {
    /// Connect to the RPC endpoint named in `config`.
    pub fn connect(config: ClientConfig) -> Self {
        let ledger = SolanaLedger::new(&config.rpc_url, config.commitment);
        Self { ledger, config }
    }

    /// Connect with defaults overridden from the environment.
    pub fn from_env() -> SdkResult<Self> {
        Ok(Self::connect(ClientConfig::from_env()?))
    }
}

impl<L: LedgerRpc> MusicNftClient<L> {
    /// Create a client over `ledger` with default settings.
    pub fn new(ledger: L) -> Self {
        Self::with_config(ledger, ClientConfig::default())
    }

    /// Create a client over `ledger` with explicit settings.
    pub fn with_config(ledger: L, config: ClientConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn program_id(&self) -> Pubkey {
        self.config.program_id
    }

    // ========================================================================
    // Account Fetchers
    // ========================================================================

    /// Fetch and decode an asset record.
    pub async fn get_asset(&self, address: &Pubkey) -> SdkResult<MusicAsset> {
        let data = self.ledger.account_data(address).await?;
        decode_asset(address, data)
    }

    /// Re-query confirmation of an already submitted transaction.
    ///
    /// Use after `ConfirmationTimeout` or `ConfirmationUnavailable` instead of resubmitting.
    pub async fn confirm(&self, signature: &Signature) -> SdkResult<ConfirmationResult> {
        confirm(
            &self.ledger,
            signature,
            self.config.commitment,
            &self.config.confirm,
        )
        .await
    }

    // ========================================================================
    // Instruction Builders
    // ========================================================================

    pub fn initialize_ix(
        &self,
        payer: &Pubkey,
        asset: &Pubkey,
        metadata: &AssetMetadata,
    ) -> SdkResult<Instruction> {
        build_initialize_ix(payer, asset, metadata, &self.config.program_id)
    }

    pub fn mint_ix(&self, payer: &Pubkey, asset: &Pubkey) -> Instruction {
        build_mint_ix(payer, asset, &self.config.program_id)
    }

    pub fn register_copyright_ix(&self, payer: &Pubkey, asset: &Pubkey) -> Instruction {
        build_register_copyright_ix(payer, asset, &self.config.program_id)
    }

    pub fn transfer_ownership_ix(
        &self,
        owner: &Pubkey,
        asset: &Pubkey,
        new_owner: &Pubkey,
    ) -> SdkResult<Instruction> {
        build_transfer_ownership_ix(owner, asset, new_owner, &self.config.program_id)
    }

    // ========================================================================
    // Flows
    // ========================================================================

    /// Assemble, sign, submit and confirm `instructions` with `wallet` as fee payer.
    ///
    /// The freshness token is fetched here, immediately before assembly. The
    /// wallet's result is verified before anything is transmitted; a rejected
    /// signature request never reaches the ledger.
    pub async fn execute<W>(
        &self,
        wallet: &W,
        instructions: &[Instruction],
        co_signers: &[&dyn Signer],
    ) -> SdkResult<ConfirmationResult>
    where
        W: WalletSigner + ?Sized,
    {
        let payer = wallet_identity(wallet)?;

        let freshness = self.ledger.latest_blockhash().await?;
        let draft = assemble(instructions, &payer, freshness, co_signers)?;
        let expected_message = draft.message_data();

        let signed = wallet.sign_transaction(draft.into_transaction()).await?;
        verify_wallet_signatures(&expected_message, &signed)?;

        let bytes = serialize_transaction(&signed)?;
        let submitted = submit(&self.ledger, &bytes).await?;

        self.confirm(&submitted.signature).await
    }

    /// Create a new asset record owned by the wallet.
    ///
    /// A fresh asset identity is generated per call and dropped once the
    /// creating transaction is signed.
    pub async fn create_asset<W>(&self, wallet: &W, metadata: &AssetMetadata) -> SdkResult<CreatedAsset>
    where
        W: WalletSigner + ?Sized,
    {
        let payer = wallet_identity(wallet)?;
        let asset_account = create_asset_account();
        let asset = asset_account.pubkey();

        let ix = self.initialize_ix(&payer, &asset, metadata)?;
        tracing::debug!(asset = %asset, title = %metadata.title, "Creating asset");

        let confirmation = self
            .execute(wallet, &[ix], &[asset_account.signer()])
            .await?;

        Ok(CreatedAsset {
            asset,
            signature: confirmation.signature,
            confirmation,
        })
    }

    /// Pin the music file, then the certificate, then create the asset.
    ///
    /// Inputs are checked before any network call.
    pub async fn upload_and_create_asset<W, P>(
        &self,
        wallet: &W,
        pinning: &P,
        upload: AssetUpload,
    ) -> SdkResult<CreatedAsset>
    where
        W: WalletSigner + ?Sized,
        P: PinningService + ?Sized,
    {
        upload.validate()?;
        wallet_identity(wallet)?;

        let AssetUpload {
            title,
            artist,
            music_file,
            certificate_file,
        } = upload;
        let (music_file, certificate_file) = match (music_file, certificate_file) {
            (Some(music), Some(certificate)) => (music, certificate),
            _ => return Err(SdkError::MissingInput("music and certificate files".to_string())),
        };

        let content_hash = pinning.pin(&music_file.name, music_file.bytes).await?;
        let certificate_hash = pinning
            .pin(&certificate_file.name, certificate_file.bytes)
            .await?;

        let metadata = AssetMetadata::new(title, artist, content_hash, certificate_hash);
        self.create_asset(wallet, &metadata).await
    }

    /// Mint an asset the wallet created.
    pub async fn mint<W>(&self, wallet: &W, asset: &Pubkey) -> SdkResult<ConfirmationResult>
    where
        W: WalletSigner + ?Sized,
    {
        let payer = wallet_identity(wallet)?;
        let ix = self.mint_ix(&payer, asset);
        self.execute(wallet, &[ix], &[]).await
    }

    /// Register the copyright of a minted asset the wallet created.
    pub async fn register_copyright<W>(
        &self,
        wallet: &W,
        asset: &Pubkey,
    ) -> SdkResult<ConfirmationResult>
    where
        W: WalletSigner + ?Sized,
    {
        let payer = wallet_identity(wallet)?;
        let ix = self.register_copyright_ix(&payer, asset);
        self.execute(wallet, &[ix], &[]).await
    }

    /// Transfer a minted asset to `new_owner`.
    pub async fn transfer_ownership<W>(
        &self,
        wallet: &W,
        asset: &Pubkey,
        new_owner: &Pubkey,
    ) -> SdkResult<ConfirmationResult>
    where
        W: WalletSigner + ?Sized,
    {
        let owner = wallet_identity(wallet)?;
        let ix = self.transfer_ownership_ix(&owner, asset, new_owner)?;
        self.execute(wallet, &[ix], &[]).await
    }
}

fn wallet_identity<W: WalletSigner + ?Sized>(wallet: &W) -> SdkResult<Pubkey> {
    wallet
        .identity()
        .ok_or_else(|| SdkError::MissingInput("connected wallet".to_string()))
}
