//! Windows FILETIME conversion

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset between the Windows epoch (1601-01-01) and the Unix epoch,
/// in 100 ns ticks.
const EPOCH_DELTA_100NS: u64 = 116_444_736_000_000_000;

/// A Windows FILETIME value: 100 ns ticks since 1601-01-01 UTC.
///
/// Kernel timestamps in a snapshot are stored in this encoding; the raw tick
/// count is kept so that values outside the chrono-representable range still
/// round-trip through reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WinTimestamp(pub u64);

impl WinTimestamp {
    pub const fn new(ticks: u64) -> Self {
        WinTimestamp(ticks)
    }

    /// Checks whether the timestamp is the zero sentinel
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Converts to a UTC datetime, if representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let unix_ticks = self.0.checked_sub(EPOCH_DELTA_100NS)?;
        let secs = (unix_ticks / 10_000_000) as i64;
        let nanos = ((unix_ticks % 10_000_000) * 100) as u32;
        Utc.timestamp_opt(secs, nanos).single()
    }
}

impl fmt::Display for WinTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "-"),
        }
    }
}
