//! Time utilities for the simulation and the ping loop

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Nominal simulation tick rate
pub const TICKS_PER_SECOND: u32 = 60;

/// Wall-clock duration of one tick
pub const TICK_DURATION: Duration = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

/// Current Unix timestamp in microseconds. Used only for ping ids; the
/// simulation itself never reads the wall clock.
pub fn unix_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_micros() as u64
}
