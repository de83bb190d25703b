//! # Kernel API
//!
//! This crate defines the interface between a mailbox and the message-queue
//! transport underneath it.
//!
//! ## Philosophy
//!
//! The transport provides **mechanisms**, not policies:
//! - Frame delivery (not message decoding)
//! - Bounded waits (the caller supplies the timeout)
//! - Queue limits (reported and adjusted, never interpreted)
//!
//! Timeouts and empty queues are ordinary outcomes of a receive, not errors.
//! Turning them into messages is the mailbox's job.
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A specific transport (trait can be implemented many ways)
//! - A broadcast fabric (every send has exactly one destination)

pub mod attributes;
pub mod error;
pub mod time;
pub mod transport;

pub use attributes::QueueAttributes;
pub use error::TransportError;
pub use time::TimeoutSettings;
pub use transport::{RawFrame, ReceiveOptions, ReceiveOutcome, Transport};
