//! Build duration between a recorded start and a completion event.

use std::fmt;

/// Wall-clock instant as fractional seconds since the Unix epoch.
pub type EpochSeconds = f64;

/// Elapsed build time, truncated to whole seconds.
///
/// Renders as `MM:SS` below one hour and `HH:MM:SS` from one hour up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct BuildDuration {
    secs: u64,
}

impl BuildDuration {
    pub const fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    /// Clock skew can put the finish before the start; that clamps to zero.
    pub fn between(started_at: EpochSeconds, finished_at: EpochSeconds) -> Self {
        let elapsed = finished_at - started_at;
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return Self::default();
        }
        Self {
            secs: elapsed.trunc() as u64,
        }
    }

    pub const fn as_secs(self) -> u64 {
        self.secs
    }
}

impl fmt::Display for BuildDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.secs / 3600;
        let minutes = (self.secs % 3600) / 60;
        let seconds = self.secs % 60;
        if hours == 0 {
            write!(f, "{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
        }
    }
}
