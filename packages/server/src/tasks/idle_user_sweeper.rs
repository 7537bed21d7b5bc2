//! Idle user sweeper background task.
//!
//! Periodically evicts participants that have not been seen for longer than
//! the configured idle threshold. The evicted connection receives
//! `KickedForInactivity`; the rest of the room receives `UserLeft` and a fresh
//! `PresenceList`. Rooms emptied this way are left to the TTL sweeper.

use std::{sync::Arc, time::Duration};

use incog_shared::time::Clock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::domain::{MessagePusher, RoomEvent, RoomRepository, Timestamp};

use super::{sweep_interval, threshold_millis};

/// Default sweep interval in seconds.
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 30;

/// Evicts idle participants.
pub struct IdleUserSweeper {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    user_idle: Duration,
    interval: Duration,
}

impl IdleUserSweeper {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        user_idle: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            user_idle,
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECONDS),
        }
    }

    /// Override the sweep interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One pass over a snapshot of the registry. Returns the number of participants evicted.
    pub async fn sweep(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let idle = threshold_millis(self.user_idle);
        let mut evicted = 0;

        for room in self.repository.list_rooms().await {
            for client_id in room.idle_participants(now, idle) {
                let Some(departure) = self
                    .repository
                    .remove_idle_participant(&room.passcode, &client_id, now, idle)
                    .await
                else {
                    continue;
                };
                evicted += 1;

                if let Err(e) = self
                    .message_pusher
                    .push_to(&client_id, &RoomEvent::KickedForInactivity)
                    .await
                {
                    debug!(client_id = %client_id, error = %e, "Could not notify evicted participant");
                }
                self.message_pusher
                    .remove_from_group(&client_id, &room.passcode)
                    .await;

                let user_left = RoomEvent::UserLeft {
                    display_name: departure.participant.display_name.into_string(),
                    participants: departure.participants.clone(),
                };
                let presence = RoomEvent::PresenceList {
                    participants: departure.participants,
                };
                for event in [user_left, presence] {
                    if let Err(e) = self
                        .message_pusher
                        .broadcast_to_group(&room.passcode, &event)
                        .await
                    {
                        warn!(passcode = %room.passcode, error = %e, "Failed to broadcast eviction");
                    }
                }

                info!(client_id = %client_id, passcode = %room.passcode, "Evicted idle participant");
            }
        }

        evicted
    }

    /// Run until `cancel_token` is triggered.
    #[instrument(skip_all, name = "task.idle_user_sweeper")]
    pub async fn run(self, cancel_token: CancellationToken) {
        info!(
            user_idle_secs = self.user_idle.as_secs_f64(),
            interval_secs = self.interval.as_secs_f64(),
            "Starting idle user sweeper task"
        );

        let mut interval = sweep_interval(self.interval);

        loop {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    info!("Idle user sweeper received shutdown signal, exiting");
                    break;
                }
                _ = interval.tick() => {
                    let evicted = self.sweep().await;
                    if evicted > 0 {
                        debug!(evicted, "Idle user sweep finished");
                    }
                }
            }
        }

        info!("Idle user sweeper task stopped");
    }
}
