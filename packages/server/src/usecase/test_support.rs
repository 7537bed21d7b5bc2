//! ユースケースのテスト用フィクスチャ

use std::sync::Arc;

use incog_shared::time::MockClock;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    domain::{ConnectionId, MessagePusher, RateLimiter, rate_limit::MockRateLimiter},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
    },
};

/// 2023-11-14T22:13:20.000Z
pub(crate) const START_MILLIS: i64 = 1_700_000_000_000;

/// 実物の Repository と MessagePusher に MockClock を組み合わせたもの
pub(crate) struct Fixture {
    pub repository: Arc<InMemoryRoomRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<MockClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::new()),
            pusher: Arc::new(WebSocketMessagePusher::new()),
            clock: Arc::new(MockClock::new(START_MILLIS)),
        }
    }

    /// クライアントを登録し、受信側を返す
    pub async fn connect(&self, id: &str) -> (ConnectionId, UnboundedReceiver<String>) {
        let id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(id.clone(), tx).await;
        (id, rx)
    }
}

/// 常に許可する RateLimiter
pub(crate) fn allow_all() -> Arc<dyn RateLimiter> {
    let mut limiter = MockRateLimiter::new();
    limiter.expect_try_consume().returning(|_, _, _, _| true);
    Arc::new(limiter)
}

/// 常に拒否する RateLimiter
pub(crate) fn deny_all() -> Arc<dyn RateLimiter> {
    let mut limiter = MockRateLimiter::new();
    limiter.expect_try_consume().returning(|_, _, _, _| false);
    Arc::new(limiter)
}

/// 受信済みのフレームをすべて JSON として取り出す
pub(crate) fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}
