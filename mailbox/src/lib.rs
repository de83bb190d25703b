//! # Mailbox
//!
//! The application-facing side of the message protocol: a [`Mailbox`] sends
//! typed messages through a [`Transport`](kernel_api::Transport) and turns
//! whatever the transport hands back into an [`Envelope`](ipc::Envelope).
//!
//! Timeouts and empty queues come back as sentinel envelopes tagged
//! `TimedOut` and `EmptyQueue`, so callers dispatch on the tag the same way
//! for every outcome. Corrupt frames are dumped to disk and then either
//! abort the process or are reported, as the [`CorruptionPolicy`] says.

pub mod config;
pub mod error;
pub mod mailbox;

pub use config::{ConfigError, CorruptionPolicy, MailboxConfig};
pub use error::MailboxError;
pub use mailbox::{Mailbox, SharedLogger};
