//! Network URL constants for the MU$IK SDK.

/// Local validator RPC URL (default).
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

/// Devnet RPC URL.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Mainnet-beta RPC URL.
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Pinata file pinning endpoint.
pub const PINATA_PIN_FILE_URL: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
