//! # Simulated Kernel
//!
//! This crate provides an in-process implementation of the transport API.
//!
//! ## Purpose
//!
//! The simulated bus allows testing mailbox behavior without a real
//! message-queue facility:
//! - Runs under `cargo test`
//! - Real blocking and timeouts (condition variable, wall-clock deadlines)
//! - Inspectable (queue depths and dropped frames are observable)
//! - Fault injection (drop, retag or truncate frames in flight)
//!
//! This is not a "mock" - it enforces the same queue limits, send failures
//! and receive outcomes a real transport reports.

pub mod bus;
pub mod fault_injection;
pub mod message_queue;

pub use bus::{SimBus, SimTransport};
pub use fault_injection::{FaultInjector, FaultPlan, FrameFault};
pub use message_queue::{MessageQueue, QueueError};
