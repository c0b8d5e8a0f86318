//! Client configuration.
//!
//! Defaults target a local validator. Values can be loaded from JSON and
//! overridden from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::error::{SdkError, SdkResult};
use crate::ledger::Commitment;
use crate::network::DEFAULT_RPC_URL;
use crate::program::constants::PROGRAM_ID;

/// Default confirmation timeout in milliseconds.
const DEFAULT_CONFIRM_TIMEOUT_MS: u64 = 30_000;

/// Default interval between status polls in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default number of consecutive failed polls tolerated.
const DEFAULT_MAX_POLL_ERRORS: u32 = 3;

/// Confirmation polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Give up after this long without settlement
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
    /// Delay between status polls
    #[serde(rename = "poll_interval_ms", with = "duration_ms")]
    pub poll_interval: Duration,
    /// Consecutive failed polls tolerated before `NetworkFailure`
    pub max_poll_errors: u32,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_CONFIRM_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_errors: DEFAULT_MAX_POLL_ERRORS,
        }
    }
}

impl ConfirmConfig {
    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the number of consecutive failed polls tolerated.
    pub fn with_max_poll_errors(mut self, max: u32) -> Self {
        self.max_poll_errors = max;
        self
    }
}

/// Settings shared read-only by every flow of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub rpc_url: String,
    #[serde(with = "pubkey_str")]
    pub program_id: Pubkey,
    pub commitment: Commitment,
    pub confirm: ConfirmConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            program_id: *PROGRAM_ID,
            commitment: Commitment::default(),
            confirm: ConfirmConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(json: &str) -> SdkResult<Self> {
        serde_json::from_str(json).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Defaults overridden by `MUSIK_*` environment variables.
    pub fn from_env() -> SdkResult<Self> {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Recognized keys: `MUSIK_RPC_URL`, `MUSIK_PROGRAM_ID`, `MUSIK_COMMITMENT`,
    /// `MUSIK_CONFIRM_TIMEOUT_MS`, `MUSIK_POLL_INTERVAL_MS`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> SdkResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MUSIK_RPC_URL") {
            self.rpc_url = url;
        }
        if let Some(id) = lookup("MUSIK_PROGRAM_ID") {
            self.program_id = Pubkey::from_str(id.trim())
                .map_err(|e| SdkError::Config(format!("MUSIK_PROGRAM_ID: {}", e)))?;
        }
        if let Some(level) = lookup("MUSIK_COMMITMENT") {
            self.commitment = level.parse()?;
        }
        if let Some(ms) = lookup("MUSIK_CONFIRM_TIMEOUT_MS") {
            self.confirm.timeout = Duration::from_millis(parse_ms("MUSIK_CONFIRM_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = lookup("MUSIK_POLL_INTERVAL_MS") {
            self.confirm.poll_interval =
                Duration::from_millis(parse_ms("MUSIK_POLL_INTERVAL_MS", &ms)?);
        }
        Ok(self)
    }
}

fn parse_ms(key: &str, value: &str) -> SdkResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| SdkError::Config(format!("{}: {}", key, e)))
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod pubkey_str {
    use std::str::FromStr;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use solana_pubkey::Pubkey;

    pub fn serialize<S: Serializer>(value: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(D::Error::custom)
    }
}
