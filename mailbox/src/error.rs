//! Mailbox error types

use crate::ConfigError;
use ipc::ProtocolError;
use kernel_api::TransportError;
use thiserror::Error;

/// Errors returned by mailbox operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailboxError {
    /// The transport refused a send or failed a receive
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A frame could not be decoded, or a buffer was misused
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl MailboxError {
    /// Checks whether this reports a corrupt frame
    pub fn is_corruption(&self) -> bool {
        matches!(self, MailboxError::Protocol(error) if error.is_corruption())
    }
}
