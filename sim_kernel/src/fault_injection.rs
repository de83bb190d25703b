//! Deterministic fault injection for testing
//!
//! Faults are applied to frames as the simulated bus delivers them, before
//! they reach the destination queue. The size limit is checked on the frame
//! as sent, so a fault can never make a frame oversized.
//!
//! ## Example
//!
//! ```
//! use sim_kernel::fault_injection::{FaultPlan, FrameFault};
//!
//! let plan = FaultPlan::new()
//!     .with_frame_fault(FrameFault::DropNext { count: 1 })
//!     .with_frame_fault(FrameFault::RewriteTag { byte: 0xEE, count: 1 });
//! ```

use std::collections::HashMap;

/// A fault to inject into frame delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameFault {
    /// Drop the next N frames to any mailbox
    DropNext { count: usize },

    /// Drop the next N frames to one mailbox
    DropNextTo { destination: String, count: usize },

    /// Overwrite the tag byte of the next N frames
    RewriteTag { byte: u8, count: usize },

    /// Cut the next N frames down to at most `len` bytes
    Truncate { len: usize, count: usize },
}

/// A plan describing all faults to inject
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    frame_faults: Vec<FrameFault>,
}

impl FaultPlan {
    /// Creates a new empty fault plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame fault to the plan
    pub fn with_frame_fault(mut self, fault: FrameFault) -> Self {
        self.frame_faults.push(fault);
        self
    }

    /// Returns the frame faults
    pub fn frame_faults(&self) -> &[FrameFault] {
        &self.frame_faults
    }
}

/// Applies a [`FaultPlan`] to frames in delivery order
#[derive(Debug, Default)]
pub struct FaultInjector {
    drop_next: usize,
    drop_next_to: HashMap<String, usize>,
    rewrite_tag: Option<(u8, usize)>,
    truncate: Option<(usize, usize)>,
    frames_processed: usize,
}

impl FaultInjector {
    /// Creates a new fault injector with the given plan
    pub fn new(plan: FaultPlan) -> Self {
        let mut injector = Self::default();
        for fault in plan.frame_faults() {
            match fault {
                FrameFault::DropNext { count } => injector.drop_next += count,
                FrameFault::DropNextTo { destination, count } => {
                    *injector.drop_next_to.entry(destination.clone()).or_default() += count;
                }
                FrameFault::RewriteTag { byte, count } => {
                    injector.rewrite_tag = Some((*byte, *count));
                }
                FrameFault::Truncate { len, count } => {
                    injector.truncate = Some((*len, *count));
                }
            }
        }
        injector
    }

    /// Applies pending faults to a frame bound for `destination`
    ///
    /// Returns `None` when the frame is dropped.
    pub fn apply(&mut self, destination: &str, mut bytes: Vec<u8>) -> Option<Vec<u8>> {
        self.frames_processed += 1;

        if self.drop_next > 0 {
            self.drop_next -= 1;
            return None;
        }
        if let Some(count) = self.drop_next_to.get_mut(destination) {
            if *count > 0 {
                *count -= 1;
                return None;
            }
        }

        if let Some((byte, count)) = self.rewrite_tag.as_mut() {
            if *count > 0 {
                *count -= 1;
                if let Some(tag) = bytes.first_mut() {
                    *tag = *byte;
                }
            }
        }
        if let Some((len, count)) = self.truncate.as_mut() {
            if *count > 0 {
                *count -= 1;
                bytes.truncate(*len);
            }
        }

        Some(bytes)
    }

    /// Returns the number of frames seen
    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }
}
