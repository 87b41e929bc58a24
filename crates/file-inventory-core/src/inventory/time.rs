//! Conversion of platform timestamps to whole epoch seconds.

use std::time::{SystemTime, UNIX_EPOCH};

/// 100 ns intervals between 1601-01-01 (the FILETIME epoch) and 1970-01-01.
pub const FILETIME_UNIX_EPOCH_OFFSET: i64 = 116_444_736_000_000_000;

const FILETIME_TICKS_PER_SECOND: i64 = 10_000_000;

/// Convert a Windows FILETIME tick count to seconds since the Unix epoch.
/// Sub-second precision is truncated toward zero.
pub fn filetime_to_unix(filetime: u64) -> i64 {
    let ticks = i128::from(filetime) - i128::from(FILETIME_UNIX_EPOCH_OFFSET);
    (ticks / i128::from(FILETIME_TICKS_PER_SECOND)) as i64
}

/// Seconds since the Unix epoch, negative for times before 1970.
pub fn system_time_to_unix(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}

/// Current UTC time in epoch seconds.
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
