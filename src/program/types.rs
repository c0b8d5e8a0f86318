//! Parameter types for the MU$IK program.

use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;

use crate::program::encoding::FieldValue;

/// Metadata of a music asset, as carried by the Initialize instruction.
///
/// Both hashes come from the pinning service and must be known before the
/// instruction is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMetadata {
    pub title: String,
    pub artist: String,
    /// Content hash of the pinned music file
    pub content_hash: String,
    /// Content hash of the pinned copyright certificate
    pub certificate_hash: String,
}

impl AssetMetadata {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        content_hash: impl Into<String>,
        certificate_hash: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            content_hash: content_hash.into(),
            certificate_hash: certificate_hash.into(),
        }
    }

    /// Fields in Initialize wire order: title, artist, content hash, certificate hash.
    pub fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::from(self.title.as_str()),
            FieldValue::from(self.artist.as_str()),
            FieldValue::from(self.content_hash.as_str()),
            FieldValue::from(self.certificate_hash.as_str()),
        ]
    }
}

/// Freshly generated identity for a new asset record.
///
/// Signs the transaction that creates the record and is then consumed; only
/// its public key is kept afterwards.
#[derive(Debug)]
pub struct EphemeralAccount {
    keypair: Keypair,
}

impl EphemeralAccount {
    /// Generate a new random identity.
    pub fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    /// Public key of the new record.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Signer used to co-sign the creating transaction.
    pub fn signer(&self) -> &Keypair {
        &self.keypair
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_field_order() {
        let metadata = AssetMetadata::new("Song", "Band", "Qm123", "Qm456");
        let fields = metadata.to_fields();
        let texts: Vec<&str> = fields.iter().filter_map(|f| f.as_text()).collect();
        assert_eq!(texts, vec!["Song", "Band", "Qm123", "Qm456"]);
    }

    #[test]
    fn test_ephemeral_accounts_are_unique() {
        let a = EphemeralAccount::generate();
        let b = EphemeralAccount::generate();
        assert_ne!(a.pubkey(), b.pubkey());
        assert_eq!(a.signer().pubkey(), a.pubkey());
    }
}
