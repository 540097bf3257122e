//! Configuration types for the Jyotish API client.
//!
//! `ClientConfig` represents the client section of `jyotish.toml`. All
//! fields have defaults matching the deployed behavior: fast gate polling
//! with a low wait ceiling, a 100 second timeout on ordinary calls, and no
//! timeout at all on the write-and-wait path.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Admission gate tuning.
///
/// Long poll intervals pile up a laggy queue under load; many fast checks
/// with a low ceiling keep contenders moving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Delay between busy-flag polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Number of polls after which a contender proceeds regardless of the
    /// busy flag.
    #[serde(default = "default_max_waits")]
    pub max_waits: u32,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_max_waits() -> u32 {
    10
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_waits: default_max_waits(),
        }
    }
}

impl GateConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Top-level configuration for the API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub gate: GateConfig,

    /// Timeout for the read and stream call paths, in seconds. `None`
    /// disables the timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: Option<u64>,

    /// Timeout for the write-and-wait call path, in seconds. `None` (the
    /// default) means the call waits for the remote as long as it takes.
    #[serde(default)]
    pub write_timeout_secs: Option<u64>,
}

fn default_request_timeout_secs() -> Option<u64> {
    Some(100)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
            write_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_secs.map(Duration::from_secs)
    }
}
