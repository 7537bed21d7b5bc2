//! Sliding-window rate limiter.
//!
//! Each `(identity, action)` key owns a queue of accepted-action timestamps
//! behind its own mutex. The outer `DashMap` only hands out the `Arc` to that
//! queue, so two keys never wait on each other.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use dashmap::DashMap;
use incog_shared::time::Clock;
use parking_lot::Mutex;

use crate::domain::{RateLimitAction, RateLimiter};

type Key = (String, RateLimitAction);

/// Sliding-window counter per (caller identity, action).
pub struct SlidingWindowRateLimiter {
    hits: DashMap<Key, Arc<Mutex<VecDeque<i64>>>>,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowRateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            hits: DashMap::new(),
            clock,
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.hits.len()
    }

    fn queue_for(&self, identity: &str, action: RateLimitAction) -> Arc<Mutex<VecDeque<i64>>> {
        self.hits
            .entry((identity.to_string(), action))
            .or_default()
            .value()
            .clone()
    }
}

fn window_millis(window: Duration) -> i64 {
    i64::try_from(window.as_millis()).unwrap_or(i64::MAX)
}

impl RateLimiter for SlidingWindowRateLimiter {
    fn try_consume(
        &self,
        identity: &str,
        action: RateLimitAction,
        limit: usize,
        window: Duration,
    ) -> bool {
        let now = self.clock.now_millis();
        let window = window_millis(window);
        let queue = self.queue_for(identity, action);
        let mut queue = queue.lock();

        while queue.front().is_some_and(|&t| now.saturating_sub(t) > window) {
            queue.pop_front();
        }
        if queue.len() >= limit {
            tracing::debug!(action = action.as_str(), limit, "rate limit exceeded");
            return false;
        }
        queue.push_back(now);
        true
    }

    fn purge_idle(&self, window: Duration) -> usize {
        let now = self.clock.now_millis();
        let window = window_millis(window);
        let before = self.hits.len();
        self.hits.retain(|_, queue| {
            // A caller between `queue_for` and the push still holds a clone.
            Arc::strong_count(queue) > 1
                || queue
                    .lock()
                    .back()
                    .is_some_and(|&newest| now.saturating_sub(newest) <= window)
        });
        before.saturating_sub(self.hits.len())
    }
}
