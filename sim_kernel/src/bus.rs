//! In-process mailbox bus
//!
//! A [`SimBus`] holds one bounded queue per open mailbox name. Every
//! [`SimTransport`] opened on the bus shares it, so frames sent from one
//! handle land in another's queue. All state sits behind a single mutex and
//! a condition variable wakes blocked receivers when frames arrive.

use crate::fault_injection::{FaultInjector, FaultPlan};
use crate::message_queue::{MessageQueue, QueueError};
use core_types::MailboxRef;
use ipc::FrameBuffer;
use kernel_api::{
    QueueAttributes, RawFrame, ReceiveOptions, ReceiveOutcome, TimeoutSettings, Transport,
    TransportError,
};
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

#[derive(Debug, Default)]
struct BusState {
    queues: HashMap<String, MessageQueue>,
    faults: Option<FaultInjector>,
    dropped: u64,
}

#[derive(Debug, Default)]
struct BusInner {
    state: Mutex<BusState>,
    arrivals: Condvar,
}

/// Shared registry of simulated mailboxes
#[derive(Debug, Clone, Default)]
pub struct SimBus {
    inner: Arc<BusInner>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a mailbox and returns the transport handle that receives on it
    pub fn open(
        &self,
        name: impl Into<MailboxRef>,
        attributes: QueueAttributes,
    ) -> Result<SimTransport, TransportError> {
        let name = name.into();
        attributes.validate()?;

        let mut state = self.lock();
        if state.queues.contains_key(name.name()) {
            return Err(TransportError::AlreadyOpen(name.name().to_string()));
        }
        state.queues.insert(
            name.name().to_string(),
            MessageQueue::with_attributes(attributes),
        );

        Ok(SimTransport {
            bus: self.clone(),
            name,
        })
    }

    /// Queues raw bytes for `destination` as if `source` had sent them
    ///
    /// Bypasses any message encoding, so tests can deliver corrupt frames.
    pub fn inject_raw(
        &self,
        destination: &MailboxRef,
        bytes: Vec<u8>,
        source: MailboxRef,
    ) -> Result<(), TransportError> {
        self.deliver(destination, FrameBuffer::from_vec(bytes), &source, true)
    }

    /// Installs a fault plan applied to every frame delivered from now on
    pub fn inject_faults(&self, plan: FaultPlan) {
        self.lock().faults = Some(FaultInjector::new(plan));
    }

    /// Removes any installed fault plan
    pub fn clear_faults(&self) {
        self.lock().faults = None;
    }

    /// Checks whether a mailbox is open under `name`
    pub fn is_open(&self, name: &str) -> bool {
        self.lock().queues.contains_key(name)
    }

    /// Returns the number of frames waiting in a mailbox
    pub fn queue_len(&self, name: &str) -> Option<usize> {
        self.lock().queues.get(name).map(MessageQueue::len)
    }

    /// Returns the number of frames dropped by connectionless sends and faults
    pub fn dropped_frames(&self) -> u64 {
        self.lock().dropped
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&self, name: &str) {
        self.lock().queues.remove(name);
        self.inner.arrivals.notify_all();
    }

    fn deliver(
        &self,
        destination: &MailboxRef,
        frame: FrameBuffer,
        source: &MailboxRef,
        confirmed: bool,
    ) -> Result<(), TransportError> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let queue = match state.queues.get_mut(destination.name()) {
            Some(queue) => queue,
            None if confirmed => {
                return Err(TransportError::Unreachable(destination.to_string()));
            }
            None => {
                state.dropped += 1;
                return Ok(());
            }
        };
        queue.attributes().check_frame_size(frame.len())?;

        let frame = match state.faults.as_mut() {
            Some(injector) => match injector.apply(destination.name(), frame.into_vec()) {
                Some(bytes) => FrameBuffer::from_vec(bytes),
                None => {
                    state.dropped += 1;
                    return Ok(());
                }
            },
            None => frame,
        };

        match queue.push(RawFrame::new(frame, source.clone())) {
            Ok(()) => {}
            Err(QueueError::Full) if confirmed => {
                return Err(TransportError::QueueFull(destination.to_string()));
            }
            Err(QueueError::Full) => {
                state.dropped += 1;
                return Ok(());
            }
        }

        drop(guard);
        self.inner.arrivals.notify_all();
        Ok(())
    }

    fn receive(
        &self,
        name: &str,
        options: ReceiveOptions,
        timeout: TimeoutSettings,
    ) -> Result<ReceiveOutcome, TransportError> {
        let deadline = timeout
            .as_duration()
            .and_then(|wait| Instant::now().checked_add(wait));
        let mut state = self.lock();

        loop {
            let queue = state
                .queues
                .get_mut(name)
                .ok_or_else(|| TransportError::ReceiveFailed(format!("{} is not open", name)))?;
            if let Some(frame) = queue.pop() {
                return Ok(ReceiveOutcome::Frame(frame));
            }
            if !options.is_blocking() {
                return Ok(ReceiveOutcome::Empty);
            }

            state = match deadline {
                None => self
                    .inner
                    .arrivals
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(ReceiveOutcome::TimedOut);
                    }
                    self.inner
                        .arrivals
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }
}

/// Transport handle for one mailbox on a [`SimBus`]
///
/// Dropping the handle closes the mailbox.
#[derive(Debug)]
pub struct SimTransport {
    bus: SimBus,
    name: MailboxRef,
}

impl SimTransport {
    /// Returns the bus this handle is attached to
    pub fn bus(&self) -> &SimBus {
        &self.bus
    }
}

impl Transport for SimTransport {
    fn name(&self) -> &MailboxRef {
        &self.name
    }

    fn send(&mut self, destination: &MailboxRef, frame: FrameBuffer) -> Result<(), TransportError> {
        self.bus.deliver(destination, frame, &self.name, true)
    }

    fn send_connectionless(
        &mut self,
        destination: &MailboxRef,
        frame: FrameBuffer,
    ) -> Result<(), TransportError> {
        self.bus.deliver(destination, frame, &self.name, false)
    }

    fn receive(
        &mut self,
        options: ReceiveOptions,
        timeout: TimeoutSettings,
    ) -> Result<ReceiveOutcome, TransportError> {
        self.bus.receive(self.name.name(), options, timeout)
    }

    fn attributes(&self) -> QueueAttributes {
        self.bus
            .lock()
            .queues
            .get(self.name.name())
            .map(MessageQueue::attributes)
            .unwrap_or_default()
    }

    fn set_attributes(
        &mut self,
        attributes: QueueAttributes,
    ) -> Result<QueueAttributes, TransportError> {
        attributes.validate()?;
        let mut state = self.bus.lock();
        let queue = state.queues.get_mut(self.name.name()).ok_or_else(|| {
            TransportError::InvalidAttributes(format!("{} is not open", self.name))
        })?;
        Ok(queue.set_attributes(attributes))
    }
}

impl Drop for SimTransport {
    fn drop(&mut self) {
        self.bus.close(self.name.name());
    }
}
