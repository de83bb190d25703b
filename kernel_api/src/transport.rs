//! The transport contract

use crate::{QueueAttributes, TimeoutSettings, TransportError};
use core_types::MailboxRef;
use ipc::FrameBuffer;

/// A frame delivered by the transport, with the sender it reported
#[derive(Debug, PartialEq)]
pub struct RawFrame {
    pub bytes: FrameBuffer,
    pub source: MailboxRef,
}

impl RawFrame {
    pub fn new(bytes: FrameBuffer, source: MailboxRef) -> Self {
        Self { bytes, source }
    }
}

/// How a receive behaves when the queue is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReceiveOptions {
    /// Wait for a frame, bounded by the request timeout
    #[default]
    Blocking,
    /// Return immediately
    NonBlocking,
}

impl ReceiveOptions {
    pub fn is_blocking(self) -> bool {
        self == ReceiveOptions::Blocking
    }
}

/// Result of a receive that did not fail
#[derive(Debug, PartialEq)]
pub enum ReceiveOutcome {
    /// A frame arrived
    Frame(RawFrame),
    /// A blocking receive waited for the whole timeout
    TimedOut,
    /// A non-blocking receive found the queue empty
    Empty,
}

/// Message-queue transport underneath a mailbox
///
/// Frames are opaque byte sequences whose boundaries the transport preserves.
/// Sending moves the frame into the transport. Methods take `&mut self`: a
/// handle is never used from two threads at once, and implementations whose
/// queues are shared between handles must synchronize internally.
pub trait Transport {
    /// Returns the name of the mailbox this handle receives on
    fn name(&self) -> &MailboxRef;

    /// Delivers a frame, reporting unreachable or full destinations
    fn send(&mut self, destination: &MailboxRef, frame: FrameBuffer) -> Result<(), TransportError>;

    /// Delivers a frame without confirmation
    ///
    /// Frames to unreachable or full destinations are dropped silently.
    /// Oversized frames are still rejected.
    fn send_connectionless(
        &mut self,
        destination: &MailboxRef,
        frame: FrameBuffer,
    ) -> Result<(), TransportError>;

    /// Takes the next frame from this handle's queue
    ///
    /// A blocking receive waits at most `timeout` (forever when it is
    /// unbounded) and reports [`ReceiveOutcome::TimedOut`] when it runs out.
    /// A non-blocking receive reports [`ReceiveOutcome::Empty`] instead of
    /// waiting.
    fn receive(
        &mut self,
        options: ReceiveOptions,
        timeout: TimeoutSettings,
    ) -> Result<ReceiveOutcome, TransportError>;

    /// Returns the limits and current depth of this handle's queue
    fn attributes(&self) -> QueueAttributes;

    /// Replaces the limits of this handle's queue, returning the previous attributes
    fn set_attributes(
        &mut self,
        attributes: QueueAttributes,
    ) -> Result<QueueAttributes, TransportError>;
}
