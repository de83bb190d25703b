//! Frame layout helpers shared by the concrete message types
//!
//! Every frame is a fixed-size header (starting with the tag byte) followed
//! by at most one variable-length field that runs to the end of the frame.
//! There are no length prefixes: the trailing field's length is always
//! `frame.len() - size_of::<Header>()`. Each message type describes its header
//! once as a `#[repr(C)]` struct of unaligned fields, and both encode and
//! decode go through that struct, so the offsets cannot drift apart.
//!
//! Multi-byte fields are native-endian and the headers have no padding.

use crate::{FrameBuffer, ProtocolError, WireTag};
use core::mem::size_of;
use zerocopy::byteorder::{NativeEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Native-endian `u32` with alignment 1
pub(crate) type NeU32 = U32<NativeEndian>;

/// Header of frames whose body is a single trailing field
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub(crate) struct TagHeader {
    pub tag: u8,
}

impl TagHeader {
    pub fn new(tag: WireTag) -> Self {
        Self { tag: tag.code() }
    }
}

/// Header of a keypad command frame: tag, command code
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub(crate) struct KeypadCommandHeader {
    pub tag: u8,
    pub command: u8,
}

/// Header of a watchdog frame: tag, class, settings, PID, failure action
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub(crate) struct WatchdogHeader {
    pub tag: u8,
    pub class: u8,
    pub base_ttl: NeU32,
    pub timeout_ms: NeU32,
    pub pid: NeU32,
    pub on_failure: u8,
}

/// Size of the fixed part of a frame laid out with header `H`
pub(crate) const fn header_len<H>() -> usize {
    size_of::<H>()
}

/// Writes `header` followed by the trailing field into a new frame
pub(crate) fn encode_frame<H>(header: &H, trailing: &[u8]) -> FrameBuffer
where
    H: IntoBytes + Immutable,
{
    let header = header.as_bytes();
    let mut bytes = Vec::with_capacity(header.len() + trailing.len());
    bytes.extend_from_slice(header);
    bytes.extend_from_slice(trailing);
    FrameBuffer::from_vec(bytes)
}

/// Splits a frame into its header and the trailing field
pub(crate) fn split_frame<H>(tag: WireTag, frame: &[u8]) -> Result<(H, &[u8]), ProtocolError>
where
    H: FromBytes,
{
    H::read_from_prefix(frame).map_err(|_| ProtocolError::Truncated {
        tag,
        needed: header_len::<H>(),
        actual: frame.len(),
    })
}

/// Reads and validates the tag byte of a frame
pub fn read_tag(frame: &[u8]) -> Result<WireTag, ProtocolError> {
    let byte = *frame.first().ok_or(ProtocolError::EmptyFrame)?;
    WireTag::from_byte(byte)
}

/// Checks that a frame carries the expected tag
pub(crate) fn expect_tag(frame: &[u8], expected: WireTag) -> Result<(), ProtocolError> {
    let found = read_tag(frame)?;
    if found != expected {
        return Err(ProtocolError::TagMismatch { expected, found });
    }
    Ok(())
}

/// Decodes a trailing field that must be UTF-8
pub(crate) fn decode_text(field: &'static str, bytes: &[u8]) -> Result<String, ProtocolError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| ProtocolError::InvalidUtf8 { field })
}
