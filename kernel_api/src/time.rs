//! Request timeout settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Maximum wait of a blocking receive (the request timeout, RTO)
///
/// Stored as whole seconds plus a sub-second nanosecond part, always
/// normalized so `nanos < 1_000_000_000`. A zero timeout means the blocking
/// receive waits without bound. Deserialized values are normalized the same
/// way as [`TimeoutSettings::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawTimeout")]
pub struct TimeoutSettings {
    secs: u64,
    nanos: u32,
}

/// Timeout as written in configuration, before normalization
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawTimeout {
    secs: u64,
    nanos: u64,
}

impl From<RawTimeout> for TimeoutSettings {
    fn from(raw: RawTimeout) -> Self {
        Self::new(raw.secs, raw.nanos)
    }
}

impl TimeoutSettings {
    /// No timeout: blocking receives wait until a frame arrives
    pub const UNBOUNDED: TimeoutSettings = TimeoutSettings { secs: 0, nanos: 0 };

    /// Creates a timeout from seconds and nanoseconds (carried into seconds)
    pub const fn new(secs: u64, nanos: u64) -> Self {
        Self {
            secs: secs.saturating_add(nanos / NANOS_PER_SEC),
            nanos: (nanos % NANOS_PER_SEC) as u32,
        }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self::new(secs, 0)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self::new(millis / 1_000, (millis % 1_000) * 1_000_000)
    }

    pub const fn from_nanos(nanos: u64) -> Self {
        Self::new(0, nanos)
    }

    pub const fn secs(&self) -> u64 {
        self.secs
    }

    /// Returns the sub-second part in nanoseconds
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    pub const fn is_unbounded(&self) -> bool {
        self.secs == 0 && self.nanos == 0
    }

    /// Returns the wait bound, or `None` when unbounded
    pub fn as_duration(&self) -> Option<Duration> {
        if self.is_unbounded() {
            None
        } else {
            Some(Duration::new(self.secs, self.nanos))
        }
    }
}

impl From<Duration> for TimeoutSettings {
    fn from(duration: Duration) -> Self {
        Self::new(duration.as_secs(), u64::from(duration.subsec_nanos()))
    }
}

impl fmt::Display for TimeoutSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            f.write_str("unbounded")
        } else {
            write!(f, "{}.{:09}s", self.secs, self.nanos)
        }
    }
}
