//! Conversion between FILETIME ticks and [`SystemTime`].
//!
//! A FILETIME counts 100-nanosecond ticks since 1601-01-01 UTC.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

const TICKS_PER_SECOND: u64 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

/// Ticks between 1601-01-01 and 1970-01-01
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;

fn duration_to_ticks(duration: Duration) -> Option<i64> {
    let ticks = duration
        .as_secs()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(u64::from(duration.subsec_nanos() / NANOS_PER_TICK))?;
    i64::try_from(ticks).ok()
}

fn ticks_to_duration(ticks: u64) -> Duration {
    let secs = ticks / TICKS_PER_SECOND;
    let nanos = (ticks % TICKS_PER_SECOND) as u32 * NANOS_PER_TICK;
    Duration::new(secs, nanos)
}

/// Convert a host timestamp to FILETIME ticks, dropping sub-tick precision.
pub fn from_system_time(time: SystemTime) -> Result<i64> {
    let ticks = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => duration_to_ticks(after).and_then(|t| UNIX_EPOCH_TICKS.checked_add(t)),
        Err(before) => {
            duration_to_ticks(before.duration()).and_then(|t| UNIX_EPOCH_TICKS.checked_sub(t))
        }
    };

    match ticks {
        Some(ticks) if ticks >= 0 => Ok(ticks),
        _ => Err(Error::TimestampOutOfRange),
    }
}

/// Convert FILETIME ticks to a host timestamp.
pub fn to_system_time(ticks: i64) -> Result<SystemTime> {
    if ticks < 0 {
        return Err(Error::InvalidFileTime(ticks));
    }

    let time = if ticks >= UNIX_EPOCH_TICKS {
        UNIX_EPOCH.checked_add(ticks_to_duration((ticks - UNIX_EPOCH_TICKS) as u64))
    } else {
        UNIX_EPOCH.checked_sub(ticks_to_duration((UNIX_EPOCH_TICKS - ticks) as u64))
    };

    time.ok_or(Error::InvalidFileTime(ticks))
}
