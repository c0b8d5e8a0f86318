//! On-chain program interaction module for MU$IK.
//!
//! Wire encoding, instruction builders, account decoding and program error
//! codes for the music asset program.

pub mod accounts;
pub mod builder;
pub mod constants;
pub mod encoding;
pub mod instructions;
pub mod program_error;
pub mod types;

// Re-export commonly used items
pub use accounts::{decode_asset, AssetStatus, MusicAsset};
pub use builder::AssetMetadataBuilder;
pub use constants::*;
pub use encoding::{
    decode, encode, encode_text, encoded_len, length_prefix, FieldKind, FieldSpec, FieldValue,
    Operation,
};
pub use instructions::*;
pub use program_error::MusicProgramError;
pub use types::{AssetMetadata, EphemeralAccount};
