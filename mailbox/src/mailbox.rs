//! The mailbox facade

use crate::{CorruptionPolicy, MailboxConfig, MailboxError};
use core_types::MailboxRef;
use ipc::{
    diagnostics, Envelope, Inbound, ProtocolError, Received, TypedMessage, WireMessage, WireTag,
};
use kernel_api::{
    QueueAttributes, ReceiveOptions, ReceiveOutcome, TimeoutSettings, Transport, TransportError,
};
use services_logger::{LogEntry, Logger, NullLogger};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Logger handle held by a mailbox
pub type SharedLogger = Arc<dyn Logger + Send + Sync>;

/// A named mailbox over a transport
///
/// Holds the request timeout used by blocking receives and the policy for
/// corrupt frames; everything else is delegated to the transport. A mailbox
/// is used from one thread at a time.
pub struct Mailbox<T: Transport> {
    transport: T,
    logger: SharedLogger,
    timeout: TimeoutSettings,
    corruption_policy: CorruptionPolicy,
    dump_directory: PathBuf,
}

impl<T: Transport> Mailbox<T> {
    /// Wraps an open transport, logging nowhere
    pub fn open(transport: T) -> Self {
        Self::with_logger(transport, Arc::new(NullLogger))
    }

    /// Wraps an open transport with an explicit logger
    pub fn with_logger(transport: T, logger: SharedLogger) -> Self {
        let defaults = MailboxConfig::default();
        let mailbox = Self {
            transport,
            logger,
            timeout: defaults.request_timeout,
            corruption_policy: defaults.corruption_policy,
            dump_directory: defaults.dump_directory,
        };
        mailbox.log(LogEntry::info("mailbox opened"));
        mailbox
    }

    /// Wraps an open transport and applies `config` to it
    pub fn open_with_config(
        transport: T,
        logger: SharedLogger,
        config: &MailboxConfig,
    ) -> Result<Self, MailboxError> {
        let mut mailbox = Self::with_logger(transport, logger);
        mailbox.set_attributes(config.attributes)?;
        mailbox.timeout = config.request_timeout;
        mailbox.corruption_policy = config.corruption_policy;
        mailbox.dump_directory = config.dump_directory.clone();
        Ok(mailbox)
    }

    /// Returns the name this mailbox receives on
    pub fn name(&self) -> &MailboxRef {
        self.transport.name()
    }

    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Serializes `message` and sends it, failing on unreachable or full destinations
    pub fn send<M>(&mut self, destination: &MailboxRef, message: &M) -> Result<(), MailboxError>
    where
        M: WireMessage + ?Sized,
    {
        self.log(
            LogEntry::info("sending message")
                .with_field("destination", destination)
                .with_field("message", message.describe()),
        );

        let frame = message.serialize();
        let size = frame.len();
        if let Err(error) = self.transport.send(destination, frame) {
            return Err(self.send_failed(destination, error));
        }

        self.log(
            LogEntry::debug("message sent")
                .with_field("destination", destination)
                .with_field("bytes", size),
        );
        Ok(())
    }

    /// Serializes `message` and sends it without delivery confirmation
    pub fn send_connectionless<M>(
        &mut self,
        destination: &MailboxRef,
        message: &M,
    ) -> Result<(), MailboxError>
    where
        M: WireMessage + ?Sized,
    {
        self.log(
            LogEntry::info("sending message")
                .with_field("destination", destination)
                .with_field("mode", "connectionless")
                .with_field("message", message.describe()),
        );

        let frame = message.serialize();
        let size = frame.len();
        if let Err(error) = self.transport.send_connectionless(destination, frame) {
            return Err(self.send_failed(destination, error));
        }

        self.log(
            LogEntry::debug("message sent")
                .with_field("destination", destination)
                .with_field("mode", "connectionless")
                .with_field("bytes", size),
        );
        Ok(())
    }

    /// Takes the next frame, or a sentinel when none is available
    ///
    /// A blocking receive that waits out the request timeout returns an
    /// envelope tagged `TimedOut`. A non-blocking receive on an empty queue
    /// returns one tagged `EmptyQueue`. A real frame comes back with its tag
    /// decoded and the sender identity the transport reported.
    pub fn receive(&mut self, options: ReceiveOptions) -> Result<Envelope, MailboxError> {
        if options.is_blocking() {
            self.log(LogEntry::debug("waiting for message").with_field("timeout", self.timeout));
        }

        let outcome = match self.transport.receive(options, self.timeout) {
            Ok(outcome) => outcome,
            Err(error) => {
                self.log(LogEntry::warn("receive failed").with_field("error", &error));
                return Err(error.into());
            }
        };

        let envelope = match outcome {
            ReceiveOutcome::TimedOut => {
                self.log(LogEntry::info("receive timed out").with_field("timeout", self.timeout));
                Envelope::sentinel(WireTag::TimedOut)
            }
            ReceiveOutcome::Empty if options.is_blocking() => {
                let error =
                    TransportError::ReceiveFailed("empty queue on a blocking receive".to_string());
                self.log(LogEntry::warn("receive failed").with_field("error", &error));
                return Err(error.into());
            }
            ReceiveOutcome::Empty => {
                self.log(LogEntry::debug("queue empty"));
                Envelope::sentinel(WireTag::EmptyQueue)
            }
            ReceiveOutcome::Frame(raw) => {
                let mut envelope = Envelope::from_frame(raw.bytes, raw.source);
                if let Err(error) = envelope.decode_tag() {
                    return Err(self.corrupted(&envelope, error));
                }
                envelope
            }
        };

        self.log(LogEntry::info("received message").with_field("envelope", envelope.describe()));
        Ok(envelope)
    }

    /// Receives and dispatches in one step
    pub fn receive_inbound(&mut self, options: ReceiveOptions) -> Result<Inbound, MailboxError> {
        let mut envelope = self.receive(options)?;
        self.open_envelope(&mut envelope)
    }

    /// Decodes a received envelope into `M`, applying the corruption policy
    pub fn unpack<M: TypedMessage>(
        &self,
        envelope: &mut Envelope,
    ) -> Result<Received<M>, MailboxError> {
        M::unpack(envelope).map_err(|error| self.rejected(envelope, error))
    }

    /// Dispatches a received envelope on its tag, applying the corruption policy
    pub fn open_envelope(&self, envelope: &mut Envelope) -> Result<Inbound, MailboxError> {
        envelope.open().map_err(|error| self.rejected(envelope, error))
    }

    /// Sets the request timeout to whole seconds, returning the previous timeout
    pub fn set_rto_secs(&mut self, secs: u64) -> TimeoutSettings {
        self.set_timeout_settings(TimeoutSettings::from_secs(secs))
    }

    /// Sets the request timeout to nanoseconds, returning the previous timeout
    pub fn set_rto_nanos(&mut self, nanos: u64) -> TimeoutSettings {
        self.set_timeout_settings(TimeoutSettings::from_nanos(nanos))
    }

    /// Replaces the request timeout, returning the previous one
    pub fn set_timeout_settings(&mut self, timeout: TimeoutSettings) -> TimeoutSettings {
        let previous = std::mem::replace(&mut self.timeout, timeout);
        self.log(
            LogEntry::debug("request timeout changed")
                .with_field("previous", previous)
                .with_field("timeout", timeout),
        );
        previous
    }

    pub fn timeout_settings(&self) -> TimeoutSettings {
        self.timeout
    }

    /// Returns the transport's queue attributes
    pub fn attributes(&self) -> QueueAttributes {
        self.transport.attributes()
    }

    /// Replaces the transport's queue attributes, returning the previous ones
    pub fn set_attributes(
        &mut self,
        attributes: QueueAttributes,
    ) -> Result<QueueAttributes, MailboxError> {
        self.transport.set_attributes(attributes).map_err(|error| {
            self.log(LogEntry::warn("set attributes failed").with_field("error", &error));
            MailboxError::from(error)
        })
    }

    pub fn corruption_policy(&self) -> CorruptionPolicy {
        self.corruption_policy
    }

    /// Replaces the corruption policy, returning the previous one
    pub fn set_corruption_policy(&mut self, policy: CorruptionPolicy) -> CorruptionPolicy {
        std::mem::replace(&mut self.corruption_policy, policy)
    }

    pub fn dump_directory(&self) -> &Path {
        &self.dump_directory
    }

    pub fn set_dump_directory(&mut self, directory: impl Into<PathBuf>) {
        self.dump_directory = directory.into();
    }

    fn log(&self, entry: LogEntry) {
        self.logger.log(entry.with_source(self.name().clone()));
    }

    fn send_failed(&self, destination: &MailboxRef, error: TransportError) -> MailboxError {
        self.log(
            LogEntry::warn("send failed")
                .with_field("destination", destination)
                .with_field("error", &error),
        );
        error.into()
    }

    fn rejected(&self, envelope: &Envelope, error: ProtocolError) -> MailboxError {
        if error.is_corruption() {
            self.corrupted(envelope, error)
        } else {
            self.log(
                LogEntry::warn("envelope rejected")
                    .with_field("envelope", envelope.describe())
                    .with_field("error", &error),
            );
            error.into()
        }
    }

    /// Dumps a corrupt frame, logs it, then aborts or reports per policy
    fn corrupted(&self, envelope: &Envelope, error: ProtocolError) -> MailboxError {
        let label = match error {
            ProtocolError::InvalidTag { .. } => "invalid_message_tag",
            ProtocolError::EmptyFrame => "empty_frame",
            _ => "corrupt_message",
        };
        let bytes = envelope.raw_bytes().unwrap_or_default();

        let mut entry = LogEntry::error("corrupt frame received")
            .with_field("error", &error)
            .with_field("from", envelope.source())
            .with_field("bytes", bytes.len());
        entry = match diagnostics::dump_raw(&self.dump_directory, label, bytes) {
            Ok(path) => entry.with_field("dump", path.display()),
            Err(dump_error) => entry.with_field("dump_error", dump_error),
        };
        self.log(entry);

        if self.corruption_policy == CorruptionPolicy::Abort {
            self.log(LogEntry::error("aborting on corrupt frame"));
            std::process::abort();
        }
        error.into()
    }
}

impl<T: Transport> Drop for Mailbox<T> {
    fn drop(&mut self) {
        self.log(LogEntry::info("mailbox closed"));
    }
}
