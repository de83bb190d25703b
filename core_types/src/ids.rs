//! Identifiers for mailbox peers and processes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name shown for a peer whose identity was never reported.
pub const UNSPECIFIED_PEER: &str = "unspecified";

/// Identity of a mailbox peer
///
/// A mailbox is addressed by its globally unique name. Received frames carry
/// the sender's reference as reported by the transport; locally built
/// messages carry an empty ("unspecified") reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MailboxRef(String);

impl MailboxRef {
    /// Creates a reference to the mailbox with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a reference with no known identity
    pub fn unspecified() -> Self {
        Self(String::new())
    }

    /// Returns the raw mailbox name (empty when unspecified)
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Checks whether this reference carries no identity
    pub fn is_unspecified(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for MailboxRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MailboxRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for MailboxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() {
            f.write_str(UNSPECIFIED_PEER)
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Operating-system process identifier
///
/// Carried on the wire as a 4-byte unsigned integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Creates a process ID from its raw value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the ID of the calling process
    pub fn current() -> Self {
        Self(std::process::id())
    }

    /// Returns the raw value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ProcessId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
