//! Room TTL sweeper background task.
//!
//! Periodically removes rooms with no activity for longer than the configured
//! TTL, tells their members the room is closed and dissolves the group. Each
//! pass also drops idle rate-limiter keys.
//!
//! # Graceful Shutdown
//!
//! The task stops via a cancellation token. A sweep already in progress
//! completes; the pending sleep is abandoned.

use std::{sync::Arc, time::Duration};

use incog_shared::time::Clock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::domain::{MessagePusher, RateLimiter, RoomEvent, RoomRepository, Timestamp};

use super::{sweep_interval, threshold_millis};

/// Default sweep interval in seconds.
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Rate-limiter keys without an accepted action for this long are dropped.
const LIMITER_RETENTION: Duration = Duration::from_secs(60);

/// Removes expired rooms.
pub struct RoomTtlSweeper {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    rate_limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
    room_ttl: Duration,
    interval: Duration,
}

impl RoomTtlSweeper {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        rate_limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
        room_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            rate_limiter,
            clock,
            room_ttl,
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECONDS),
        }
    }

    /// Override the sweep interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One pass over a snapshot of the registry. Returns the number of rooms removed.
    pub async fn sweep(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let ttl = threshold_millis(self.room_ttl);
        let mut removed = 0;

        for snapshot in self.repository.list_rooms().await {
            if !snapshot.is_expired(now, ttl) {
                continue;
            }
            // The live entry may have been touched since the snapshot was taken.
            let Some(room) = self
                .repository
                .remove_expired_room(&snapshot.passcode, now, ttl)
                .await
            else {
                continue;
            };
            removed += 1;

            if let Err(e) = self
                .message_pusher
                .broadcast_to_group(&room.passcode, &RoomEvent::RoomClosed)
                .await
            {
                warn!(passcode = %room.passcode, error = %e, "Failed to notify expired room");
            }
            self.message_pusher.dissolve_group(&room.passcode).await;

            info!(
                passcode = %room.passcode,
                participants = room.participants.len(),
                "Room expired and removed"
            );
        }

        let purged = self.rate_limiter.purge_idle(LIMITER_RETENTION);
        if purged > 0 {
            debug!(purged, "Dropped idle rate limiter keys");
        }

        removed
    }

    /// Run until `cancel_token` is triggered.
    #[instrument(skip_all, name = "task.room_ttl_sweeper")]
    pub async fn run(self, cancel_token: CancellationToken) {
        info!(
            room_ttl_secs = self.room_ttl.as_secs_f64(),
            interval_secs = self.interval.as_secs_f64(),
            "Starting room TTL sweeper task"
        );

        let mut interval = sweep_interval(self.interval);

        loop {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    info!("Room TTL sweeper received shutdown signal, exiting");
                    break;
                }
                _ = interval.tick() => {
                    let removed = self.sweep().await;
                    if removed > 0 {
                        debug!(removed, "Room TTL sweep finished");
                    }
                }
            }
        }

        info!("Room TTL sweeper task stopped");
    }
}
