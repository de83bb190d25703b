//! Typed messages and the unpack protocol
//!
//! A typed message is decoded out of an [`Envelope`] exactly once. Unpacking
//! moves the envelope's [`FrameBuffer`](crate::FrameBuffer) out, decodes the
//! fields, records the sender and drops the raw bytes: from then on the
//! decoded fields are the only copy of the data.

use crate::codec::{self, read_tag};
use crate::diagnostics;
use crate::{DumpError, Envelope, FrameBuffer, ProtocolError, WireTag};
use core_types::MailboxRef;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Contract shared by everything that can be put on the wire
pub trait WireMessage {
    /// Returns the tag written as the first byte of this message's frame
    fn tag(&self) -> WireTag;

    /// Encodes the current fields into a new frame (first byte is the tag)
    fn serialize(&self) -> FrameBuffer;

    /// Returns a one-line summary for logs and diagnostics
    fn describe(&self) -> String;

    /// Writes the encoded frame to `<path>.dump`
    fn dump(&self, path: &Path) -> Result<PathBuf, DumpError> {
        let frame = self.serialize();
        diagnostics::write_dump(path, frame.as_bytes())
    }
}

/// A domain message type with its own wire layout
pub trait TypedMessage: WireMessage + Sized {
    /// Tag identifying this type on the wire
    const TAG: WireTag;

    /// Decodes fields from a frame whose tag is known to be [`Self::TAG`]
    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError>;

    /// Decodes a complete frame, checking its tag first
    fn deserialize(frame: &[u8]) -> Result<Self, ProtocolError> {
        codec::expect_tag(frame, Self::TAG)?;
        Self::decode_frame(frame)
    }

    /// Consumes the envelope's buffer and decodes it into this type
    ///
    /// Fails without touching the envelope when its tag does not match or its
    /// buffer was already released. When the fields themselves fail to
    /// decode the envelope also keeps its bytes, so they can still be dumped.
    fn unpack(envelope: &mut Envelope) -> Result<Received<Self>, ProtocolError> {
        let message = {
            let frame = envelope.frame()?;
            let found = read_tag(frame)?;
            if found != Self::TAG {
                return Err(ProtocolError::TagMismatch {
                    expected: Self::TAG,
                    found,
                });
            }
            Self::decode_frame(frame)?
        };

        let buffer = envelope.release()?;
        let source = envelope.source().clone();
        drop(buffer);

        Ok(Received::new(message, source))
    }
}

/// A decoded message together with the identity of its sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received<M> {
    message: M,
    source: MailboxRef,
}

impl<M> Received<M> {
    /// Pairs a message with its sender
    pub fn new(message: M, source: MailboxRef) -> Self {
        Self { message, source }
    }

    /// Returns the decoded message
    pub fn message(&self) -> &M {
        &self.message
    }

    /// Returns the sender identity reported by the transport
    pub fn source(&self) -> &MailboxRef {
        &self.source
    }

    /// Drops the sender identity and returns the message
    pub fn into_inner(self) -> M {
        self.message
    }

    /// Splits into message and sender
    pub fn into_parts(self) -> (M, MailboxRef) {
        (self.message, self.source)
    }

    /// Converts the message while keeping the sender
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> Received<N> {
        Received {
            message: f(self.message),
            source: self.source,
        }
    }
}

impl<M> Deref for Received<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.message
    }
}
