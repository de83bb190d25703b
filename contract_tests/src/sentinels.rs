//! Tag set and sentinel contract tests
//!
//! The tag set is closed: every value outside it must be rejected.

use ipc::WireTag;

// ===== Tag Values =====
const TAG_NONE: u8 = 0;
const TAG_EMPTY_QUEUE: u8 = 1;
const TAG_TIMED_OUT: u8 = 2;

/// Number of valid tag values
pub const TAG_COUNT: usize = 8;

/// Returns the tags synthesized by the receiving side
pub fn sentinel_tags() -> [(WireTag, u8); 2] {
    [
        (WireTag::EmptyQueue, TAG_EMPTY_QUEUE),
        (WireTag::TimedOut, TAG_TIMED_OUT),
    ]
}

// ===== Contract Tests =====
