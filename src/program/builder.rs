//! Fluent builder for asset metadata.

use crate::error::{SdkError, SdkResult};
use crate::program::types::AssetMetadata;

/// Builder for [`AssetMetadata`] with a fluent API.
///
/// Unlike constructing the struct directly, `build` reports which required
/// field was never supplied.
///
/// # Example
///
/// ```rust,ignore
/// use musik_sdk::prelude::*;
///
/// let metadata = AssetMetadataBuilder::new()
///     .title("Song")
///     .artist("Band")
///     .content_hash(music_hash)
///     .certificate_hash(certificate_hash)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssetMetadataBuilder {
    title: Option<String>,
    artist: Option<String>,
    content_hash: Option<String>,
    certificate_hash: Option<String>,
}

impl AssetMetadataBuilder {
    /// Create a new metadata builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (required).
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the artist (required).
    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the content hash of the pinned music file (required).
    pub fn content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = Some(hash.into());
        self
    }

    /// Set the content hash of the pinned certificate (required).
    pub fn certificate_hash(mut self, hash: impl Into<String>) -> Self {
        self.certificate_hash = Some(hash.into());
        self
    }

    /// Build the metadata.
    ///
    /// Empty strings are accepted (they encode as zero-length fields); a field
    /// that was never set fails with `MissingInput`.
    pub fn build(self) -> SdkResult<AssetMetadata> {
        Ok(AssetMetadata {
            title: self.title.ok_or_else(|| missing("title"))?,
            artist: self.artist.ok_or_else(|| missing("artist"))?,
            content_hash: self.content_hash.ok_or_else(|| missing("content_hash"))?,
            certificate_hash: self
                .certificate_hash
                .ok_or_else(|| missing("certificate_hash"))?,
        })
    }
}

fn missing(field: &str) -> SdkError {
    SdkError::MissingInput(field.to_string())
}
