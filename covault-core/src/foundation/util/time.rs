use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock timestamp in nanoseconds since the Unix epoch.
pub fn now_nanos() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0)
}
