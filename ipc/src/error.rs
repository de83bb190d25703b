//! Protocol error types

use crate::WireTag;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while encoding, decoding or unpacking frames
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A decode was attempted on a message that owns no buffer
    #[error("Cannot decode message: no buffer present")]
    MissingBuffer,

    /// The frame holds zero bytes, so not even a tag can be read
    #[error("Cannot decode message: frame is empty")]
    EmptyFrame,

    /// The leading byte is outside the closed tag set
    #[error("Message has invalid tag byte: {byte}")]
    InvalidTag { byte: u8 },

    /// An envelope was unpacked into a message type with a different tag
    #[error("Tag mismatch: expected {expected}, found {found}")]
    TagMismatch { expected: WireTag, found: WireTag },

    /// A sentinel or untagged frame was decoded as a data message
    #[error("Frames tagged {tag} carry no message body")]
    NoPayload { tag: WireTag },

    /// The envelope's buffer was already released (double unpack/release)
    #[error("Envelope buffer was already released")]
    AlreadyReleased,

    /// The frame is shorter than the fixed part of its layout
    #[error("Frame too short for {tag}: need {needed} bytes, got {actual}")]
    Truncated {
        tag: WireTag,
        needed: usize,
        actual: usize,
    },

    /// A fixed-size enum field holds an unknown code
    #[error("Invalid value {value} for field '{field}'")]
    InvalidField { field: &'static str, value: u8 },

    /// The keypad password is not valid UTF-8
    #[error("Field '{field}' is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },
}

impl ProtocolError {
    /// Checks whether this error means the bytes on the wire are corrupt
    ///
    /// Everything except the ownership and caller-contract violations
    /// (`MissingBuffer`, `AlreadyReleased`, `TagMismatch`, `NoPayload`) counts.
    ///
    /// `MissingBuffer` is misuse, not corruption: received frames always land
    /// in an envelope with a buffer, so it only comes from an envelope the
    /// caller built without one. There are no bytes to dump for it, and the
    /// abort policy does not fire.
    pub fn is_corruption(&self) -> bool {
        !matches!(
            self,
            ProtocolError::MissingBuffer
                | ProtocolError::AlreadyReleased
                | ProtocolError::TagMismatch { .. }
                | ProtocolError::NoPayload { .. }
        )
    }
}

/// Failure to write a diagnostics dump
#[derive(Debug, Error)]
#[error("Cannot write dump to {}: {source}", .path.display())]
pub struct DumpError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
