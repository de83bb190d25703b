//! # Mailbox wire protocol
//!
//! This crate defines the messages exchanged between cooperating processes
//! over named mailboxes, and how they are laid out on the wire.
//!
//! ## Frames
//!
//! Every frame starts with a one-byte [`WireTag`] naming its kind. The rest
//! of the frame is a fixed header specific to that kind followed by at most
//! one trailing field that runs to the end of the frame. Trailing fields are
//! opaque bytes ([`WireString`]); only the keypad password must be UTF-8.
//! Frames carry no length prefixes; the transport preserves message
//! boundaries.
//!
//! ## Ownership
//!
//! A received frame lands in an [`Envelope`]. Decoding it into a
//! [`TypedMessage`] moves the bytes out of the envelope exactly once: the
//! decoded fields become the only copy and the envelope is left empty.
//!
//! ## Sentinels
//!
//! `TimedOut` and `EmptyQueue` are not sent by peers. The receiving side
//! synthesizes them as one-byte frames so callers can branch on the tag the
//! same way they do for real messages.

pub mod buffer;
pub mod codec;
pub mod diagnostics;
pub mod error;
pub mod keypad;
pub mod message;
pub mod rfid;
pub mod tag;
pub mod text;
pub mod typed;
pub mod watchdog;
pub mod wire_string;

pub use buffer::FrameBuffer;
pub use codec::read_tag;
pub use diagnostics::{dump_path, dump_raw, write_dump, DUMP_EXTENSION};
pub use error::{DumpError, ProtocolError};
pub use keypad::{KeypadCommand, KeypadCommandMessage, KeypadPasswordMessage};
pub use message::{DataMessage, Envelope, Inbound};
pub use rfid::RfidMessage;
pub use tag::WireTag;
pub use text::StringMessage;
pub use typed::{Received, TypedMessage, WireMessage};
pub use watchdog::{
    ActionOnFailure, CorrelationError, MessageClass, RequestLedger, SlotSettings, WatchdogMessage,
};
pub use wire_string::WireString;
