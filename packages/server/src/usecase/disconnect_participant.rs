//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 参加中の全ルームからの削除と UserLeft / PresenceList の通知
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：切断時に残りの参加者へ通知される
//! - 複数ルームに参加していた場合もすべてから削除されることを確認
//! - 最後の参加者が切断してもルームは残る（TTL で削除される）ことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断、どのルームにも参加していない接続の切断

use std::sync::Arc;

use incog_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, RoomEvent, RoomRepository, Timestamp};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 参加者切断を実行
    ///
    /// 失敗しない。戻り値は参加者として削除されたルームの数。
    pub async fn execute(&self, caller: &ConnectionId) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let mut left = 0;

        for passcode in self.repository.rooms_of(caller).await {
            // 1. Repository から削除（同時に他の経路で削除済みなら何もしない）
            let Some(departure) = self
                .repository
                .remove_participant(&passcode, caller, now)
                .await
            else {
                continue;
            };
            left += 1;
            self.message_pusher.remove_from_group(caller, &passcode).await;

            // 2. 残りの参加者へ通知
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
                    .broadcast_to_group(&passcode, &event)
                    .await
                {
                    tracing::warn!(passcode = %passcode, error = %e, "failed to broadcast leave");
                }
            }
        }

        // 3. MessagePusher から登録解除
        self.message_pusher.remove_from_all_groups(caller).await;
        self.message_pusher.unregister_client(caller).await;

        tracing::info!(client_id = %caller, rooms = left, "participant disconnected");
        left
    }
}
