//! Transport error types

use thiserror::Error;

/// Errors reported by a transport
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No mailbox is open under the destination name
    #[error("Destination unreachable: {0}")]
    Unreachable(String),

    /// The destination queue holds its maximum number of messages
    #[error("Queue full: {0}")]
    QueueFull(String),

    /// The frame exceeds the destination's maximum message size
    #[error("Frame of {size} bytes exceeds the {max} byte limit")]
    FrameTooLarge { size: usize, max: usize },

    /// A mailbox with this name is already open
    #[error("Mailbox already open: {0}")]
    AlreadyOpen(String),

    /// Queue attributes rejected by the transport
    #[error("Invalid queue attributes: {0}")]
    InvalidAttributes(String),

    /// Receive failed for a reason other than timeout or empty queue
    #[error("Failed to receive message: {0}")]
    ReceiveFailed(String),
}

impl TransportError {
    /// Checks whether the failure concerns the destination rather than the frame
    pub fn is_destination_failure(&self) -> bool {
        matches!(
            self,
            TransportError::Unreachable(_) | TransportError::QueueFull(_)
        )
    }
}
