//! Mailbox configuration
//!
//! Every field has a default, so a config file only names what it changes:
//!
//! ```json
//! {
//!     "attributes": { "max_messages": 32 },
//!     "request_timeout": { "secs": 0, "nanos": 100000000 },
//!     "corruption_policy": "report",
//!     "dump_directory": "/var/tmp"
//! }
//! ```

use kernel_api::{QueueAttributes, TimeoutSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What a mailbox does after dumping a corrupt frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionPolicy {
    /// Log and abort the process
    #[default]
    Abort,
    /// Log and return the error to the caller
    Report,
}

/// Errors that can occur while loading a configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Settings applied when a mailbox is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    /// Queue limits requested from the transport
    pub attributes: QueueAttributes,
    /// Request timeout of blocking receives (zero waits without bound)
    pub request_timeout: TimeoutSettings,
    pub corruption_policy: CorruptionPolicy,
    /// Where corrupt frames are dumped
    pub dump_directory: PathBuf,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            attributes: QueueAttributes::default(),
            request_timeout: TimeoutSettings::UNBOUNDED,
            corruption_policy: CorruptionPolicy::default(),
            dump_directory: PathBuf::from("."),
        }
    }
}

impl MailboxConfig {
    /// Parses a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Renders the configuration as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
