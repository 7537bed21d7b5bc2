//! Background tasks.
//!
//! Both sweepers run until their cancellation token is triggered.

pub mod idle_user_sweeper;
pub mod room_ttl_sweeper;

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

pub use idle_user_sweeper::IdleUserSweeper;
pub use room_ttl_sweeper::RoomTtlSweeper;

/// Interval whose first tick fires one full period after start.
fn sweep_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Convert a threshold to whole milliseconds, saturating.
fn threshold_millis(threshold: Duration) -> i64 {
    i64::try_from(threshold.as_millis()).unwrap_or(i64::MAX)
}
