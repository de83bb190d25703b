//! Resilience Test Utilities
//!
//! This crate provides shared utilities for resilience and integration tests.
//!
//! ## Test Philosophy
//!
//! - **Sentinels, not errors**: Timeouts and empty queues come back as messages
//! - **Deterministic failures**: Corrupt frames are injected, never hoped for
//! - **Single ownership**: A frame's bytes are decoded once and never aliased
//! - **Evidence first**: Every corrupt frame leaves a dump behind

use core_types::MailboxRef;
use kernel_api::QueueAttributes;
use mailbox::{CorruptionPolicy, Mailbox, MailboxConfig, MailboxError};
use services_logger::MemoryLogger;
use sim_kernel::{SimBus, SimTransport};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A simulated bus with a shared in-memory logger and a dump directory
pub struct TestNetwork {
    pub bus: SimBus,
    pub logger: Arc<MemoryLogger>,
    dumps: TempDir,
}

impl TestNetwork {
    /// Creates an empty network
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            bus: SimBus::new(),
            logger: Arc::new(MemoryLogger::new()),
            dumps: tempfile::tempdir()?,
        })
    }

    /// Returns the configuration test mailboxes are opened with
    ///
    /// Corrupt frames are reported rather than aborting the test process.
    pub fn config(&self) -> MailboxConfig {
        MailboxConfig {
            corruption_policy: CorruptionPolicy::Report,
            dump_directory: self.dumps.path().to_path_buf(),
            ..MailboxConfig::default()
        }
    }

    /// Opens a mailbox with the test configuration
    pub fn mailbox(&self, name: &str) -> Result<Mailbox<SimTransport>, MailboxError> {
        self.mailbox_with(name, &self.config())
    }

    /// Opens a mailbox with an explicit configuration
    pub fn mailbox_with(
        &self,
        name: &str,
        config: &MailboxConfig,
    ) -> Result<Mailbox<SimTransport>, MailboxError> {
        let transport = self.bus.open(name, QueueAttributes::default())?;
        Mailbox::open_with_config(transport, self.logger.clone(), config)
    }

    /// Delivers raw bytes to `destination` as if `source` had sent them
    pub fn inject(&self, destination: &str, bytes: &[u8], source: &str) -> Result<(), MailboxError> {
        self.bus.inject_raw(
            &MailboxRef::new(destination),
            bytes.to_vec(),
            MailboxRef::new(source),
        )?;
        Ok(())
    }

    pub fn dump_directory(&self) -> &Path {
        self.dumps.path()
    }

    /// Lists the dump files written so far, sorted by name
    pub fn dumps(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths = fs::read_dir(self.dumps.path())?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<io::Result<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }
}
