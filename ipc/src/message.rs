//! Envelopes and the closed set of data messages

use crate::codec::read_tag;
use crate::diagnostics;
use crate::{
    DumpError, FrameBuffer, KeypadCommandMessage, KeypadPasswordMessage, ProtocolError, Received,
    RfidMessage, StringMessage, TypedMessage, WatchdogMessage, WireMessage, WireTag,
};
use core_types::MailboxRef;
use std::path::{Path, PathBuf};

/// A frame as received, not yet decoded into a domain type
///
/// The envelope owns the raw bytes until a [`TypedMessage::unpack`] (or
/// [`Envelope::open`]) moves them out. After that it reports no buffer and
/// any further attempt to take the bytes fails with
/// [`ProtocolError::AlreadyReleased`].
#[derive(Debug, Default)]
pub struct Envelope {
    tag: WireTag,
    buffer: Option<FrameBuffer>,
    released: bool,
    source: MailboxRef,
}

impl Envelope {
    /// Creates a bufferless envelope carrying only a tag
    pub fn new(tag: WireTag) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    /// Creates a synthetic 1-byte frame holding `tag`
    ///
    /// Used for the transport sentinels (`TimedOut`, `EmptyQueue`).
    pub fn sentinel(tag: WireTag) -> Self {
        let mut envelope = Self::new(tag);
        envelope.buffer = Some(envelope.serialize());
        envelope
    }

    /// Wraps received bytes; the tag stays `None` until [`decode_tag`](Self::decode_tag)
    pub fn from_frame(buffer: FrameBuffer, source: MailboxRef) -> Self {
        Self {
            tag: WireTag::None,
            buffer: Some(buffer),
            released: false,
            source,
        }
    }

    /// Reads byte 0 of the buffer into the envelope's tag
    pub fn decode_tag(&mut self) -> Result<WireTag, ProtocolError> {
        let tag = read_tag(self.frame()?)?;
        self.tag = tag;
        Ok(tag)
    }

    /// Hands the buffer to the caller; the envelope is bufferless afterwards
    pub fn release(&mut self) -> Result<FrameBuffer, ProtocolError> {
        match self.buffer.take() {
            Some(buffer) => {
                self.released = true;
                Ok(buffer)
            }
            None if self.released => Err(ProtocolError::AlreadyReleased),
            None => Err(ProtocolError::MissingBuffer),
        }
    }

    pub(crate) fn frame(&self) -> Result<&[u8], ProtocolError> {
        match &self.buffer {
            Some(buffer) => Ok(buffer.as_bytes()),
            None if self.released => Err(ProtocolError::AlreadyReleased),
            None => Err(ProtocolError::MissingBuffer),
        }
    }

    /// Returns the sender identity
    pub fn source(&self) -> &MailboxRef {
        &self.source
    }

    /// Sets the sender identity
    pub fn set_source(&mut self, source: MailboxRef) {
        self.source = source;
    }

    /// Checks whether the envelope still owns its bytes
    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Checks whether the bytes were handed out
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Returns the raw bytes while the envelope still owns them
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(FrameBuffer::as_bytes)
    }

    /// Returns the frame size (0 once released)
    pub fn size(&self) -> usize {
        self.buffer.as_ref().map_or(0, FrameBuffer::len)
    }

    /// Decodes the envelope into whatever it carries
    ///
    /// This is the dispatch-on-tag entry point: sentinels and untagged frames
    /// come back as their own variants and keep their bytes. Everything else
    /// is decoded into a [`DataMessage`] and the envelope's buffer is
    /// consumed. On failure the envelope keeps its bytes.
    pub fn open(&mut self) -> Result<Inbound, ProtocolError> {
        match self.decode_tag()? {
            WireTag::None => Ok(Inbound::Untagged),
            WireTag::TimedOut => Ok(Inbound::TimedOut),
            WireTag::EmptyQueue => Ok(Inbound::EmptyQueue),
            _ => {
                let message = DataMessage::deserialize(self.frame()?)?;
                let buffer = self.release()?;
                drop(buffer);
                Ok(Inbound::Message(Received::new(message, self.source.clone())))
            }
        }
    }
}

impl WireMessage for Envelope {
    fn tag(&self) -> WireTag {
        self.tag
    }

    /// Emits only the tag byte; never re-encodes a received frame
    fn serialize(&self) -> FrameBuffer {
        FrameBuffer::tag_only(self.tag.code())
    }

    fn describe(&self) -> String {
        format!(
            "Envelope - tag: {} ({} bytes) from: {}",
            self.tag,
            self.size(),
            self.source
        )
    }

    /// Dumps the received bytes, or the tag-only frame once they are gone
    fn dump(&self, path: &Path) -> Result<PathBuf, DumpError> {
        match &self.buffer {
            Some(buffer) => diagnostics::write_dump(path, buffer.as_bytes()),
            None => diagnostics::write_dump(path, self.serialize().as_bytes()),
        }
    }
}

/// Every data message kind, for dispatch on tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMessage {
    KeypadPassword(KeypadPasswordMessage),
    KeypadCommand(KeypadCommandMessage),
    Rfid(RfidMessage),
    Text(StringMessage),
    Watchdog(WatchdogMessage),
}

impl DataMessage {
    /// Decodes a complete frame into the variant named by its tag
    pub fn deserialize(frame: &[u8]) -> Result<Self, ProtocolError> {
        let tag = read_tag(frame)?;
        match tag {
            WireTag::KeypadPassword => KeypadPasswordMessage::decode_frame(frame).map(Self::from),
            WireTag::KeypadCommand => KeypadCommandMessage::decode_frame(frame).map(Self::from),
            WireTag::Rfid => RfidMessage::decode_frame(frame).map(Self::from),
            WireTag::StringMsg => StringMessage::decode_frame(frame).map(Self::from),
            WireTag::Watchdog => WatchdogMessage::decode_frame(frame).map(Self::from),
            WireTag::None | WireTag::EmptyQueue | WireTag::TimedOut => {
                Err(ProtocolError::NoPayload { tag })
            }
        }
    }

    fn inner(&self) -> &dyn WireMessage {
        match self {
            DataMessage::KeypadPassword(m) => m,
            DataMessage::KeypadCommand(m) => m,
            DataMessage::Rfid(m) => m,
            DataMessage::Text(m) => m,
            DataMessage::Watchdog(m) => m,
        }
    }
}

impl WireMessage for DataMessage {
    fn tag(&self) -> WireTag {
        self.inner().tag()
    }

    fn serialize(&self) -> FrameBuffer {
        self.inner().serialize()
    }

    fn describe(&self) -> String {
        self.inner().describe()
    }
}

impl From<KeypadPasswordMessage> for DataMessage {
    fn from(message: KeypadPasswordMessage) -> Self {
        DataMessage::KeypadPassword(message)
    }
}

impl From<KeypadCommandMessage> for DataMessage {
    fn from(message: KeypadCommandMessage) -> Self {
        DataMessage::KeypadCommand(message)
    }
}

impl From<RfidMessage> for DataMessage {
    fn from(message: RfidMessage) -> Self {
        DataMessage::Rfid(message)
    }
}

impl From<StringMessage> for DataMessage {
    fn from(message: StringMessage) -> Self {
        DataMessage::Text(message)
    }
}

impl From<WatchdogMessage> for DataMessage {
    fn from(message: WatchdogMessage) -> Self {
        DataMessage::Watchdog(message)
    }
}

/// What a received envelope turned out to hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A frame tagged `None`
    Untagged,
    /// The blocking receive ran out of time
    TimedOut,
    /// The non-blocking receive found nothing queued
    EmptyQueue,
    /// A decoded data message and its sender
    Message(Received<DataMessage>),
}

impl Inbound {
    /// Checks whether this is a transport sentinel
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Inbound::TimedOut | Inbound::EmptyQueue)
    }
}
