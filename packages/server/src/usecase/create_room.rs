//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 作成者が所有者かつ最初の参加者としてグループに入ることを保証
//! - 表示名の省略時に `Host-xxxxx` が使われることを確認
//! - レート制限・表示名エラー時に状態が変化しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：表示名あり / なし / 空白のみ
//! - 異常系：レート制限超過、不正な表示名

use std::sync::Arc;

use incog_shared::time::Clock;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, Participant, Passcode, PasscodeFactory,
    RateLimitAction, RateLimiter, Room, RoomRepository, Timestamp, rate_limit,
};

use super::error::SessionError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    rate_limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        rate_limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            rate_limiter,
            clock,
        }
    }

    /// ルーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `caller` - 作成者の接続 ID
    /// * `origin` - レート制限に使う呼び出し元の識別子
    /// * `display_name` - 表示名（省略または空白のみなら `Host-xxxxx`）
    ///
    /// # Returns
    ///
    /// * `Ok(Passcode)` - 作成されたルームのパスコード
    /// * `Err(SessionError)` - `RateLimited` / `InvalidName` / `Collision`
    pub async fn execute(
        &self,
        caller: &ConnectionId,
        origin: &str,
        display_name: Option<&str>,
    ) -> Result<Passcode, SessionError> {
        if !rate_limit::admit(self.rate_limiter.as_ref(), origin, RateLimitAction::Create) {
            tracing::warn!(client_id = %caller, "create rate limited");
            return Err(SessionError::RateLimited);
        }

        let display_name = match display_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => DisplayName::new(name)?,
            None => DisplayName::host_default(caller),
        };

        let now = Timestamp::new(self.clock.now_millis());
        let passcode = PasscodeFactory::generate_unique(self.repository.as_ref()).await;
        let host = Participant::new(caller.clone(), display_name, now);

        // 生成から登録までの間に同じパスコードが使われた場合は Collision
        self.repository
            .create_room(Room::with_host(passcode.clone(), host, now))
            .await?;
        self.message_pusher.add_to_group(caller, &passcode).await;

        tracing::info!(client_id = %caller, passcode = %passcode, "room created");
        Ok(passcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Fixture, allow_all, deny_all, drain};

    fn usecase(fixture: &Fixture, limiter: Arc<dyn RateLimiter>) -> CreateRoomUseCase {
        CreateRoomUseCase::new(
            fixture.repository.clone(),
            fixture.pusher.clone(),
            limiter,
            fixture.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_create_room_makes_caller_owner_and_member() {
        // テスト項目: 作成者が所有者・参加者・グループメンバーになる
        // given (前提条件):
        let fixture = Fixture::new();
        let (alice, mut rx) = fixture.connect("alice-connection").await;
        let usecase = usecase(&fixture, allow_all());

        // when (操作):
        let passcode = usecase
            .execute(&alice, "10.0.0.1", Some("  Alice  "))
            .await
            .unwrap();

        // then (期待する結果):
        let room = fixture.repository.get_room(&passcode).await.unwrap();
        assert!(room.is_owner(&alice));
        assert_eq!(room.participant_names(), vec!["Alice"]);
        assert_eq!(room.last_activity_at.value(), fixture.clock.now_millis());
        assert_eq!(
            fixture.pusher.members_of(&passcode).await,
            vec!["alice-connection"]
        );
        // 作成時にはブロードキャストしない
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_create_room_defaults_host_name() {
        // テスト項目: 表示名を省略、または空白のみの場合は Host-xxxxx になる
        // given (前提条件):
        let fixture = Fixture::new();
        let (caller, _rx) = fixture.connect("abcdef-123").await;
        let usecase = usecase(&fixture, allow_all());

        // when (操作):
        let omitted = usecase.execute(&caller, "ip", None).await.unwrap();
        let blank = usecase.execute(&caller, "ip", Some("   ")).await.unwrap();

        // then (期待する結果):
        for passcode in [omitted, blank] {
            let room = fixture.repository.get_room(&passcode).await.unwrap();
            assert_eq!(room.participant_names(), vec!["Host-abcde"]);
        }
    }

    #[tokio::test]
    async fn test_create_room_rejects_invalid_name_without_side_effects() {
        // テスト項目: 不正な表示名は InvalidName でルームは作成されない
        // given (前提条件):
        let fixture = Fixture::new();
        let (caller, _rx) = fixture.connect("c1").await;
        let usecase = usecase(&fixture, allow_all());

        // when (操作):
        let result = usecase.execute(&caller, "ip", Some("<b>bold</b>")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::InvalidName));
        assert_eq!(fixture.repository.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_create_room_rate_limited() {
        // テスト項目: レート制限を超えると RateLimited でルームは作成されない
        // given (前提条件):
        let fixture = Fixture::new();
        let (caller, _rx) = fixture.connect("c1").await;
        let usecase = usecase(&fixture, deny_all());

        // when (操作):
        let result = usecase.execute(&caller, "ip", Some("Alice")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::RateLimited));
        assert_eq!(fixture.repository.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_create_room_uses_create_policy() {
        // テスト項目: create の制限（3 回 / 60 秒）で RateLimiter に問い合わせる
        // given (前提条件):
        let fixture = Fixture::new();
        let (caller, _rx) = fixture.connect("c1").await;
        let mut limiter = rate_limit::MockRateLimiter::new();
        limiter
            .expect_try_consume()
            .withf(|identity, action, limit, window| {
                identity.to_string() == "203.0.113.7"
                    && *action == RateLimitAction::Create
                    && *limit == 3
                    && window.as_secs() == 60
            })
            .times(1)
            .returning(|_, _, _, _| true);
        let usecase = usecase(&fixture, Arc::new(limiter));

        // when (操作):
        let result = usecase.execute(&caller, "203.0.113.7", None).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
