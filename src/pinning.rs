//! Content pinning.
//!
//! Music and certificate files are pinned to IPFS before the asset is
//! created; the returned content identifiers become the `content_hash` and
//! `certificate_hash` fields of the asset.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{SdkError, SdkResult};

/// Stores a file and returns its content identifier.
#[async_trait]
pub trait PinningService: Send + Sync {
    async fn pin(&self, file_name: &str, bytes: Vec<u8>) -> SdkResult<String>;
}

/// Successful pin response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: Option<u64>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
}

/// Extract the content identifier from a pin response body.
pub fn parse_pin_response(body: &str) -> SdkResult<String> {
    let response: PinResponse = serde_json::from_str(body)
        .map_err(|e| SdkError::Pinning(format!("unexpected pin response: {}", e)))?;
    if response.ipfs_hash.is_empty() {
        return Err(SdkError::Pinning("pin response has an empty IpfsHash".to_string()));
    }
    Ok(response.ipfs_hash)
}

#[cfg(feature = "http")]
pub use pinata::{PinataClient, PinataClientBuilder};

#[cfg(feature = "http")]
mod pinata {
    use std::env;
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::multipart::{Form, Part};
    use reqwest::Client;

    use super::{parse_pin_response, PinningService};
    use crate::error::{SdkError, SdkResult};
    use crate::network::PINATA_PIN_FILE_URL;

    /// Default request timeout in seconds. Uploads can be large.
    const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Builder for configuring [`PinataClient`].
    #[derive(Debug, Clone)]
    pub struct PinataClientBuilder {
        endpoint: String,
        api_key: Option<String>,
        secret_key: Option<String>,
        timeout: Duration,
    }

    impl Default for PinataClientBuilder {
        fn default() -> Self {
            Self {
                endpoint: PINATA_PIN_FILE_URL.to_string(),
                api_key: None,
                secret_key: None,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            }
        }
    }

    impl PinataClientBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Override the pin endpoint (required for self-hosted gateways and tests).
        pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
            self.endpoint = endpoint.into();
            self
        }

        /// Set the API key (required).
        pub fn api_key(mut self, key: impl Into<String>) -> Self {
            self.api_key = Some(key.into());
            self
        }

        /// Set the secret API key (required).
        pub fn secret_key(mut self, key: impl Into<String>) -> Self {
            self.secret_key = Some(key.into());
            self
        }

        /// Set the request timeout.
        pub fn timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        /// Build the client.
        pub fn build(self) -> SdkResult<PinataClient> {
            let api_key = self
                .api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| SdkError::Config("pinata api key is required".to_string()))?;
            let secret_key = self
                .secret_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| SdkError::Config("pinata secret key is required".to_string()))?;

            let http_client = Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| SdkError::Config(format!("http client: {}", e)))?;

            Ok(PinataClient {
                http_client,
                endpoint: self.endpoint,
                api_key,
                secret_key,
            })
        }
    }

    /// Pinata `pinFileToIPFS` client.
    #[derive(Clone)]
    pub struct PinataClient {
        http_client: Client,
        endpoint: String,
        api_key: String,
        secret_key: String,
    }

    impl std::fmt::Debug for PinataClient {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("PinataClient")
                .field("endpoint", &self.endpoint)
                .finish_non_exhaustive()
        }
    }

    impl PinataClient {
        pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> SdkResult<Self> {
            Self::builder().api_key(api_key).secret_key(secret_key).build()
        }

        pub fn builder() -> PinataClientBuilder {
            PinataClientBuilder::new()
        }

        /// Credentials from `PINATA_API_KEY` and `PINATA_SECRET_KEY`.
        pub fn from_env() -> SdkResult<Self> {
            let mut builder = Self::builder();
            if let Ok(key) = env::var("PINATA_API_KEY") {
                builder = builder.api_key(key);
            }
            if let Ok(key) = env::var("PINATA_SECRET_KEY") {
                builder = builder.secret_key(key);
            }
            builder.build()
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait]
    impl PinningService for PinataClient {
        async fn pin(&self, file_name: &str, bytes: Vec<u8>) -> SdkResult<String> {
            let size = bytes.len();
            let part = Part::bytes(bytes).file_name(file_name.to_string());
            let form = Form::new().part("file", part);

            let response = self
                .http_client
                .post(&self.endpoint)
                .header("pinata_api_key", &self.api_key)
                .header("pinata_secret_api_key", &self.secret_key)
                .multipart(form)
                .send()
                .await
                .map_err(|e| SdkError::NetworkFailure(format!("pinning {}: {}", file_name, e)))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| SdkError::NetworkFailure(format!("pinning {}: {}", file_name, e)))?;

            if !status.is_success() {
                tracing::warn!(file = file_name, status = %status, "Pin request rejected");
                return Err(if status.is_server_error() {
                    SdkError::NetworkFailure(format!("pinning service returned {}", status))
                } else {
                    SdkError::Pinning(format!("HTTP {}: {}", status, body))
                });
            }

            let cid = parse_pin_response(&body)?;
            tracing::debug!(file = file_name, bytes = size, cid = %cid, "File pinned");
            Ok(cid)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_builder_requires_keys() {
            assert!(matches!(
                PinataClient::builder().api_key("k").build(),
                Err(SdkError::Config(_))
            ));
            assert!(matches!(
                PinataClient::builder().secret_key("s").build(),
                Err(SdkError::Config(_))
            ));
            assert!(matches!(
                PinataClient::new("", "s"),
                Err(SdkError::Config(_))
            ));
        }

        #[test]
        fn test_builder_defaults_to_pinata() {
            let client = PinataClient::new("k", "s").unwrap();
            assert_eq!(client.endpoint(), PINATA_PIN_FILE_URL);

            let custom = PinataClient::builder()
                .api_key("k")
                .secret_key("s")
                .endpoint("http://127.0.0.1:9999/pin")
                .build()
                .unwrap();
            assert_eq!(custom.endpoint(), "http://127.0.0.1:9999/pin");
        }

        #[test]
        fn test_debug_hides_credentials() {
            let client = PinataClient::new("visible-key", "hidden-secret").unwrap();
            let debug = format!("{:?}", client);
            assert!(!debug.contains("hidden-secret"));
            assert!(!debug.contains("visible-key"));
        }
    }
}
