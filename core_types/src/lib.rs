//! # Core Types
//!
//! This crate defines the identifiers shared by every mailbox crate.
//!
//! ## Key Types
//!
//! - [`MailboxRef`]: Identity of a mailbox peer (sender or destination)
//! - [`ProcessId`]: 4-byte process identifier carried by watchdog messages

pub mod ids;

pub use ids::{MailboxRef, ProcessId, UNSPECIFIED_PEER};
