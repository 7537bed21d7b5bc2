//! UseCase: HTTP からのルーム予約
//!
//! パスコードだけを払い出し、所有者の居ないルームを作成する。
//! 最初に参加した接続が所有者になる。

use std::sync::Arc;

use incog_shared::time::Clock;

use crate::domain::{
    Passcode, PasscodeFactory, RateLimitAction, RateLimiter, Room, RoomRepository, Timestamp,
    rate_limit,
};

use super::error::SessionError;

/// ルーム予約のユースケース
pub struct ReserveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    rate_limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
}

impl ReserveRoomUseCase {
    /// 新しい ReserveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        rate_limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            rate_limiter,
            clock,
        }
    }

    pub async fn execute(&self, origin: &str) -> Result<Passcode, SessionError> {
        if !rate_limit::admit(self.rate_limiter.as_ref(), origin, RateLimitAction::Reserve) {
            tracing::warn!("reserve rate limited");
            return Err(SessionError::RateLimited);
        }

        let now = Timestamp::new(self.clock.now_millis());
        let passcode = PasscodeFactory::generate_unique(self.repository.as_ref()).await;
        self.repository
            .create_room(Room::new(passcode.clone(), now))
            .await?;

        tracing::info!(passcode = %passcode, "room reserved");
        Ok(passcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, DisplayName, Participant},
        infrastructure::rate_limiter::SlidingWindowRateLimiter,
        usecase::test_support::Fixture,
    };

    #[tokio::test]
    async fn test_reserved_room_has_no_owner_until_first_join() {
        // テスト項目: 予約したルームには所有者が無く、最初の参加者が所有者になる
        // given (前提条件):
        let fixture = Fixture::new();
        let limiter = Arc::new(SlidingWindowRateLimiter::new(fixture.clock.clone()));
        let usecase =
            ReserveRoomUseCase::new(fixture.repository.clone(), limiter, fixture.clock.clone());

        // when (操作):
        let passcode = usecase.execute("192.0.2.1").await.unwrap();
        let room = fixture.repository.get_room(&passcode).await.unwrap();
        let first = ConnectionId::new("first".to_string()).unwrap();
        let now = Timestamp::new(fixture.clock.now_millis());
        let outcome = fixture
            .repository
            .join_room(
                &passcode,
                Participant::new(first, DisplayName::new("First").unwrap(), now),
                now,
            )
            .await;

        // then (期待する結果):
        assert!(room.owner.is_none());
        assert!(room.participants.is_empty());
        assert!(outcome.is_owner);
        assert!(!outcome.room_created);
    }

    #[tokio::test]
    async fn test_reserve_allows_three_per_minute() {
        // テスト項目: 同じ接続元からの予約は 60 秒に 3 回まで
        // given (前提条件):
        let fixture = Fixture::new();
        let limiter = Arc::new(SlidingWindowRateLimiter::new(fixture.clock.clone()));
        let usecase =
            ReserveRoomUseCase::new(fixture.repository.clone(), limiter, fixture.clock.clone());

        // when (操作):
        for _ in 0..3 {
            assert!(usecase.execute("192.0.2.1").await.is_ok());
        }
        let fourth = usecase.execute("192.0.2.1").await;
        fixture.clock.advance(60_001);
        let after_window = usecase.execute("192.0.2.1").await;

        // then (期待する結果):
        assert_eq!(fourth, Err(SessionError::RateLimited));
        assert!(after_window.is_ok());
        assert_eq!(fixture.repository.count_rooms().await, 4);
    }
}
