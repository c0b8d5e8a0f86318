//! Constants for the MU$IK program.
//!
//! Program IDs, wire-format sizes and transaction limits matching the
//! on-chain program exactly.

use solana_pubkey::Pubkey;
use std::str::FromStr;

// ============================================================================
// Program IDs
// ============================================================================

lazy_static::lazy_static! {
    /// MU$IK Program ID
    pub static ref PROGRAM_ID: Pubkey = Pubkey::from_str("9h4jHLwgmwdRJETCYFx28Q85xarwzaqUwuimMvkfVLeX").unwrap();
}

/// System Program ID
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_sdk_ids::system_program::ID;

// ============================================================================
// Wire Format
// ============================================================================

/// Size of the operation discriminant
pub const DISCRIMINANT_SIZE: usize = 1;
/// Size of a string length prefix (u32 little-endian)
pub const LENGTH_PREFIX_SIZE: usize = 4;
/// Size of a serialized public key
pub const PUBKEY_SIZE: usize = 32;

// ============================================================================
// Limits
// ============================================================================

/// Maximum serialized transaction size accepted by the ledger
pub const PACKET_DATA_SIZE: usize = 1232;
