//! Queue limits reported by the transport

use crate::TransportError;
use serde::{Deserialize, Serialize};

/// Attributes of a mailbox queue
///
/// `max_messages` and `max_message_size` are enforced by the transport.
/// `flags` and `current_messages` are passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueAttributes {
    /// Transport-specific flags
    pub flags: u32,
    /// Maximum number of queued messages
    pub max_messages: usize,
    /// Maximum frame size in bytes
    pub max_message_size: usize,
    /// Messages currently queued (read-only, ignored when setting)
    pub current_messages: usize,
}

impl QueueAttributes {
    pub const DEFAULT_MAX_MESSAGES: usize = 10;
    pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 8192;

    /// Creates attributes with the given limits
    pub fn new(max_messages: usize, max_message_size: usize) -> Self {
        Self {
            max_messages,
            max_message_size,
            ..Self::default()
        }
    }

    /// Rejects limits no queue can operate with
    pub fn validate(&self) -> Result<(), TransportError> {
        if self.max_messages == 0 {
            return Err(TransportError::InvalidAttributes(
                "max_messages must be at least 1".to_string(),
            ));
        }
        if self.max_message_size == 0 {
            return Err(TransportError::InvalidAttributes(
                "max_message_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks a frame against the size limit
    pub fn check_frame_size(&self, size: usize) -> Result<(), TransportError> {
        if size > self.max_message_size {
            return Err(TransportError::FrameTooLarge {
                size,
                max: self.max_message_size,
            });
        }
        Ok(())
    }
}

impl Default for QueueAttributes {
    fn default() -> Self {
        Self {
            flags: 0,
            max_messages: Self::DEFAULT_MAX_MESSAGES,
            max_message_size: Self::DEFAULT_MAX_MESSAGE_SIZE,
            current_messages: 0,
        }
    }
}
