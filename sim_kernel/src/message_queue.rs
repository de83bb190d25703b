//! Bounded frame queue backing a simulated mailbox.
//!
//! Provides deterministic FIFO ordering with explicit capacity limits.

use kernel_api::{QueueAttributes, RawFrame};
use std::collections::VecDeque;

/// Queue error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    Full,
}

/// Bounded FIFO queue of received frames.
#[derive(Debug)]
pub struct MessageQueue {
    attributes: QueueAttributes,
    frames: VecDeque<RawFrame>,
}

impl MessageQueue {
    /// Creates a queue with the given limits.
    pub fn with_attributes(attributes: QueueAttributes) -> Self {
        Self {
            attributes,
            frames: VecDeque::new(),
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.attributes.max_messages
    }

    /// Returns the limits, with `current_messages` filled in.
    pub fn attributes(&self) -> QueueAttributes {
        QueueAttributes {
            current_messages: self.frames.len(),
            ..self.attributes
        }
    }

    /// Replaces the limits and returns the previous ones.
    ///
    /// Frames already queued are kept even when they exceed the new limits.
    pub fn set_attributes(&mut self, attributes: QueueAttributes) -> QueueAttributes {
        let previous = self.attributes();
        self.attributes = QueueAttributes {
            current_messages: 0,
            ..attributes
        };
        previous
    }

    /// Returns the number of queued frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns remaining capacity.
    pub fn remaining_capacity(&self) -> usize {
        self.capacity().saturating_sub(self.frames.len())
    }

    /// Pushes a frame onto the queue.
    pub fn push(&mut self, frame: RawFrame) -> Result<(), QueueError> {
        if self.frames.len() >= self.capacity() {
            return Err(QueueError::Full);
        }
        self.frames.push_back(frame);
        Ok(())
    }

    /// Pops the next frame.
    pub fn pop(&mut self) -> Option<RawFrame> {
        self.frames.pop_front()
    }
}
