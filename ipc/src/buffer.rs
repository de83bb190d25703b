//! Single-owner frame buffer

use std::fmt;

/// Raw bytes of one frame, owned by exactly one holder
///
/// Not `Clone`: handing it to another owner is a move, and a released
/// buffer cannot be reached through its old owner.
#[derive(PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Takes ownership of raw frame bytes
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Creates a buffer holding only a tag byte (sentinel frames)
    pub fn tag_only(code: u8) -> Self {
        Self { bytes: vec![code] }
    }

    /// Returns the frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the frame size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Checks whether the frame holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the leading (tag) byte, if any
    pub fn first_byte(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Gives the bytes back to the caller
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for FrameBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl AsRef<[u8]> for FrameBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("len", &self.bytes.len())
            .field("tag", &self.first_byte())
            .finish()
    }
}
