//! Account structures and deserialization for MU$IK.
//!
//! The program stores each asset record borsh-serialized, so the record is
//! variable length: strings are `u32 LE length + UTF-8`, booleans one byte.

use chrono::{DateTime, Utc};
use solana_pubkey::Pubkey;

use crate::error::{SdkError, SdkResult};
use crate::program::encoding::{length_prefix, ByteReader};

// ============================================================================
// MusicAsset Account
// ============================================================================

/// Lifecycle stage of an asset record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetStatus {
    /// Initialized, not yet minted
    Created,
    /// Minted, copyright not registered
    Minted,
    /// Minted and copyright registered
    CopyrightRegistered,
}

/// MusicAsset account - the on-chain record written by Initialize
///
/// Layout:
/// - artist (string)
/// - title (string)
/// - ipfs_hash (string)
/// - certificate_hash (string)
/// - timestamp (i64)
/// - is_minted (bool)
/// - creator (32 bytes)
/// - copyright_registered (bool)
/// - creation_date (i64)
///
/// `artist` precedes `title` here, the reverse of the Initialize payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicAsset {
    pub artist: String,
    pub title: String,
    /// Content hash of the music file
    pub ipfs_hash: String,
    /// Content hash of the copyright certificate
    pub certificate_hash: String,
    /// Unix timestamp of the last Initialize
    pub timestamp: i64,
    pub is_minted: bool,
    /// Creator, or current owner after a transfer
    pub creator: Pubkey,
    pub copyright_registered: bool,
    /// Unix timestamp of creation
    pub creation_date: i64,
}

impl MusicAsset {
    /// Size of the fixed-width tail (timestamp, is_minted, creator, copyright_registered, creation_date)
    pub const FIXED_LEN: usize = 8 + 1 + 32 + 1 + 8;

    /// Deserialize from account data.
    ///
    /// Trailing bytes beyond the record are ignored.
    pub fn deserialize(data: &[u8]) -> SdkResult<Self> {
        let mut reader = ByteReader::new(data);

        Ok(Self {
            artist: reader.read_string()?,
            title: reader.read_string()?,
            ipfs_hash: reader.read_string()?,
            certificate_hash: reader.read_string()?,
            timestamp: reader.read_i64()?,
            is_minted: reader.read_bool()?,
            creator: reader.read_pubkey()?,
            copyright_registered: reader.read_bool()?,
            creation_date: reader.read_i64()?,
        })
    }

    /// Serialize to the program's account layout.
    ///
    /// Fails with `EncodingOverflow` if a string does not fit its `u32` prefix.
    pub fn serialize(&self) -> SdkResult<Vec<u8>> {
        let strings = [
            ("artist", &self.artist),
            ("title", &self.title),
            ("ipfs_hash", &self.ipfs_hash),
            ("certificate_hash", &self.certificate_hash),
        ];
        let len = strings.iter().map(|(_, s)| 4 + s.len()).sum::<usize>() + Self::FIXED_LEN;

        let mut data = Vec::with_capacity(len);
        for (field, s) in strings {
            data.extend_from_slice(&length_prefix(field, s.len())?);
            data.extend_from_slice(s.as_bytes());
        }
        data.extend_from_slice(&self.timestamp.to_le_bytes());
        data.push(self.is_minted as u8);
        data.extend_from_slice(self.creator.as_ref());
        data.push(self.copyright_registered as u8);
        data.extend_from_slice(&self.creation_date.to_le_bytes());
        Ok(data)
    }

    /// Current lifecycle stage.
    pub fn status(&self) -> AssetStatus {
        match (self.is_minted, self.copyright_registered) {
            (true, true) => AssetStatus::CopyrightRegistered,
            (true, false) => AssetStatus::Minted,
            // The program only registers copyright on minted assets
            (false, _) => AssetStatus::Created,
        }
    }

    /// Creation time, if the stored timestamp is representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.creation_date, 0)
    }

    /// Whether `signer` may mint this asset.
    pub fn can_mint(&self, signer: &Pubkey) -> bool {
        !self.is_minted && self.creator == *signer
    }

    /// Whether `signer` may register the copyright of this asset.
    pub fn can_register_copyright(&self, signer: &Pubkey) -> bool {
        self.is_minted && !self.copyright_registered && self.creator == *signer
    }

    /// Whether `signer` may transfer this asset.
    pub fn can_transfer(&self, signer: &Pubkey) -> bool {
        self.is_minted && self.creator == *signer
    }
}

/// Decode an account fetched by address, mapping an absent account to `AccountNotFound`.
pub fn decode_asset(address: &Pubkey, data: Option<Vec<u8>>) -> SdkResult<MusicAsset> {
    let data = data.ok_or(SdkError::AccountNotFound(*address))?;
    MusicAsset::deserialize(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asset() -> MusicAsset {
        MusicAsset {
            artist: "Band".to_string(),
            title: "Song".to_string(),
            ipfs_hash: "Qm123".to_string(),
            certificate_hash: "Qm456".to_string(),
            timestamp: 1_700_000_000,
            is_minted: false,
            creator: Pubkey::new_from_array([7u8; 32]),
            copyright_registered: false,
            creation_date: 1_700_000_000,
        }
    }

    #[test]
    fn test_music_asset_layout() {
        let asset = sample_asset();
        let data = asset.serialize().unwrap();

        assert_eq!(data.len(), 4 + 4 + 4 + 4 + 4 + 5 + 4 + 5 + MusicAsset::FIXED_LEN);
        // artist first
        assert_eq!(&data[0..4], &[4, 0, 0, 0]);
        assert_eq!(&data[4..8], b"Band");
        assert_eq!(&data[12..16], b"Song");
    }

    #[test]
    fn test_music_asset_serialize_checks_string_lengths() {
        let asset = sample_asset();
        let data = asset.serialize().unwrap();
        assert_eq!(&data[0..4], &length_prefix("artist", asset.artist.len()).unwrap());

        // Same prefix path serialize takes for each string field
        let oversized = u32::MAX as usize + 1;
        assert!(matches!(
            length_prefix("title", oversized),
            Err(SdkError::EncodingOverflow { ref field, len }) if field == "title" && len == oversized
        ));
    }

    #[test]
    fn test_music_asset_deserialize() {
        let asset = sample_asset();
        let decoded = MusicAsset::deserialize(&asset.serialize().unwrap()).unwrap();
        assert_eq!(decoded, asset);
        assert_eq!(decoded.status(), AssetStatus::Created);
    }

    #[test]
    fn test_music_asset_ignores_trailing_bytes() {
        let asset = sample_asset();
        let mut data = asset.serialize().unwrap();
        data.extend_from_slice(&[0u8; 16]);
        assert_eq!(MusicAsset::deserialize(&data).unwrap(), asset);
    }

    #[test]
    fn test_music_asset_truncated() {
        let data = sample_asset().serialize().unwrap();
        let result = MusicAsset::deserialize(&data[..data.len() - 1]);
        assert!(matches!(result, Err(SdkError::InvalidDataLength { .. })));
    }

    #[test]
    fn test_music_asset_invalid_bool() {
        let mut data = sample_asset().serialize().unwrap();
        // is_minted sits right after the strings and the timestamp
        let is_minted_offset = data.len() - MusicAsset::FIXED_LEN + 8;
        data[is_minted_offset] = 2;
        assert!(matches!(
            MusicAsset::deserialize(&data),
            Err(SdkError::Serialization(_))
        ));
    }

    #[test]
    fn test_status_and_permissions() {
        let mut asset = sample_asset();
        let creator = asset.creator;
        let stranger = Pubkey::new_unique();

        assert!(asset.can_mint(&creator));
        assert!(!asset.can_mint(&stranger));
        assert!(!asset.can_register_copyright(&creator));
        assert!(!asset.can_transfer(&creator));

        asset.is_minted = true;
        assert_eq!(asset.status(), AssetStatus::Minted);
        assert!(!asset.can_mint(&creator));
        assert!(asset.can_register_copyright(&creator));
        assert!(asset.can_transfer(&creator));
        assert!(!asset.can_transfer(&stranger));

        asset.copyright_registered = true;
        assert_eq!(asset.status(), AssetStatus::CopyrightRegistered);
        assert!(!asset.can_register_copyright(&creator));
    }

    #[test]
    fn test_created_at() {
        let asset = sample_asset();
        assert_eq!(asset.created_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_decode_asset_missing() {
        let address = Pubkey::new_unique();
        assert!(matches!(
            decode_asset(&address, None),
            Err(SdkError::AccountNotFound(a)) if a == address
        ));
    }
}
