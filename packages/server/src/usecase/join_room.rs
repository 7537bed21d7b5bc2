//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加後の UserJoined / PresenceList のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 参加者一覧がソート済みで全員に届くことを保証
//! - 所有者が一度だけ決まることを確認
//! - 存在しないルームへの参加で暗黙的にルームが作成されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成済みルームへの参加、未作成ルームへの参加、同じ接続での再参加
//! - 異常系：パスコード形式エラー、表示名エラー、レート制限超過

use std::sync::Arc;

use incog_shared::time::Clock;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, Participant, Passcode, RateLimitAction,
    RateLimiter, RoomEvent, RoomRepository, Timestamp, rate_limit,
};

use super::error::SessionError;

/// 参加結果（クライアントへの返信内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRoomOutput {
    pub is_owner: bool,
    pub display_name: String,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    rate_limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
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

    /// ルーム参加を実行
    ///
    /// ルームが存在しなければ作成し、所有者が居なければ呼び出し元を所有者にする。
    pub async fn execute(
        &self,
        caller: &ConnectionId,
        origin: &str,
        passcode: &str,
        display_name: &str,
    ) -> Result<JoinRoomOutput, SessionError> {
        if !rate_limit::admit(self.rate_limiter.as_ref(), origin, RateLimitAction::Join) {
            tracing::warn!(client_id = %caller, "join rate limited");
            return Err(SessionError::RateLimited);
        }

        let passcode = Passcode::normalize(passcode)?;
        let display_name = DisplayName::new(display_name)?;

        let now = Timestamp::new(self.clock.now_millis());
        let participant = Participant::new(caller.clone(), display_name.clone(), now);
        let outcome = self.repository.join_room(&passcode, participant, now).await;
        self.message_pusher.add_to_group(caller, &passcode).await;

        if outcome.room_created {
            tracing::info!(passcode = %passcode, "room created implicitly by join");
        }
        tracing::info!(
            client_id = %caller,
            passcode = %passcode,
            is_owner = outcome.is_owner,
            participants = outcome.participants.len(),
            "participant joined"
        );

        let joined = RoomEvent::UserJoined {
            display_name: display_name.as_str().to_string(),
            participants: outcome.participants.clone(),
        };
        let presence = RoomEvent::PresenceList {
            participants: outcome.participants,
        };
        for event in [joined, presence] {
            if let Err(e) = self
                .message_pusher
                .broadcast_to_group(&passcode, &event)
                .await
            {
                tracing::warn!(passcode = %passcode, error = %e, "failed to broadcast join");
            }
        }

        Ok(JoinRoomOutput {
            is_owner: outcome.is_owner,
            display_name: display_name.into_string(),
        })
    }
}
