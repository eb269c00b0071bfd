//! Wall-clock timestamps as stored in the session timestamp file.
//!
//! The file holds one decimal seconds-since-epoch value with microsecond
//! precision, e.g. `1700000000.250000`.

use std::{fmt, str::FromStr, time::Duration};

use chrono::Utc;

/// Point in time, measured from the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const fn from_epoch(since_epoch: Duration) -> Self {
        Self(since_epoch)
    }

    pub const fn since_epoch(self) -> Duration {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.0.as_secs(), self.0.subsec_micros())
    }
}

impl FromStr for Timestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let secs: f64 = trimmed
            .parse()
            .map_err(|e| format!("'{trimmed}' is not a decimal timestamp: {e}"))?;
        Duration::try_from_secs_f64(secs)
            .map(Self)
            .map_err(|e| format!("'{trimmed}' is not a valid timestamp: {e}"))
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Utc::now();
        let secs = u64::try_from(now.timestamp()).unwrap_or(0);
        Timestamp(Duration::new(secs, now.timestamp_subsec_nanos()))
    }
}
