//! Wire tags: the first byte of every frame

use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the kind of message held in a frame
///
/// The discriminants are the on-wire codes and must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum WireTag {
    /// No kind assigned (freshly constructed envelope)
    #[default]
    None = 0,
    /// Sentinel: non-blocking receive found the queue empty
    EmptyQueue = 1,
    /// Sentinel: blocking receive ran out of time
    TimedOut = 2,
    KeypadPassword = 3,
    KeypadCommand = 4,
    Rfid = 5,
    StringMsg = 6,
    Watchdog = 7,
}

impl WireTag {
    /// Every tag in wire-code order
    pub const ALL: [WireTag; 8] = [
        WireTag::None,
        WireTag::EmptyQueue,
        WireTag::TimedOut,
        WireTag::KeypadPassword,
        WireTag::KeypadCommand,
        WireTag::Rfid,
        WireTag::StringMsg,
        WireTag::Watchdog,
    ];

    /// Returns the on-wire code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a tag byte, rejecting anything outside the closed set
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        Self::ALL
            .get(usize::from(byte))
            .copied()
            .ok_or(ProtocolError::InvalidTag { byte })
    }

    /// Returns the human-readable name of this tag
    pub const fn name(self) -> &'static str {
        match self {
            WireTag::None => "None",
            WireTag::EmptyQueue => "EmptyQueue",
            WireTag::TimedOut => "TimedOut",
            WireTag::KeypadPassword => "KeypadPassword",
            WireTag::KeypadCommand => "KeypadCommand",
            WireTag::Rfid => "RFID",
            WireTag::StringMsg => "StringMsg",
            WireTag::Watchdog => "Watchdog",
        }
    }

    /// Checks whether this tag marks a transport condition rather than data
    pub const fn is_sentinel(self) -> bool {
        matches!(self, WireTag::EmptyQueue | WireTag::TimedOut)
    }
}

impl TryFrom<u8> for WireTag {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte)
    }
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
