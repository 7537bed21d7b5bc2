//! RateLimiter trait と操作ごとの制限値

use std::time::Duration;

/// Actions subject to admission control, each with its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitAction {
    /// `CreateRoom` over the socket
    Create,
    /// `JoinRoom` over the socket
    Join,
    /// `POST /rooms`
    Reserve,
}

impl RateLimitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitAction::Create => "create",
            RateLimitAction::Join => "join",
            RateLimitAction::Reserve => "reserve",
        }
    }

    /// Accepted actions per window.
    pub fn limit(&self) -> usize {
        match self {
            RateLimitAction::Create | RateLimitAction::Reserve => 3,
            RateLimitAction::Join => 10,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(60)
    }
}

/// RateLimiter trait
///
/// キーは (呼び出し元の識別子, 操作種別)。
#[cfg_attr(test, mockall::automock)]
pub trait RateLimiter: Send + Sync {
    /// Record an action and report whether it is admitted.
    ///
    /// Rejected attempts are not recorded.
    fn try_consume(
        &self,
        identity: &str,
        action: RateLimitAction,
        limit: usize,
        window: Duration,
    ) -> bool;

    /// Drop counters with no accepted action inside `window`. Returns how many were dropped.
    fn purge_idle(&self, window: Duration) -> usize;
}

/// Apply the action's own policy.
pub fn admit(limiter: &dyn RateLimiter, identity: &str, action: RateLimitAction) -> bool {
    limiter.try_consume(identity, action, action.limit(), action.window())
}
