//! UseCase: ルーム終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EndRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 所有者だけがルームを終了できることを保証
//! - 終了時に全員へ RoomClosed が届き、グループが解散されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：所有者による終了
//! - 異常系：所有者以外による終了、パスコード形式エラー
//! - エッジケース：存在しないルームの終了（何もしない）、所有者の切断後、作り直されたルーム

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Passcode, RoomEvent, RoomRepository};

use super::error::SessionError;

/// ルーム終了のユースケース
pub struct EndRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl EndRoomUseCase {
    /// 新しい EndRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム終了を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - ルームを終了した、またはルームが既に存在しない
    /// * `Err(SessionError)` - `InvalidFormat` / `NotOwner`
    pub async fn execute(&self, caller: &ConnectionId, passcode: &str) -> Result<(), SessionError> {
        let passcode = Passcode::normalize(passcode)?;

        // 1. 所有者の確認と削除を同時に行う
        let removed = match self.repository.remove_room_if_owner(&passcode, caller).await {
            Ok(Some(room)) => room,
            Ok(None) => return Ok(()),
            Err(e) => {
                tracing::warn!(client_id = %caller, passcode = %passcode, error = %e, "end room refused");
                return Err(e.into());
            }
        };

        // 2. グループ全員へ通知してからグループを解散
        if let Err(e) = self
            .message_pusher
            .broadcast_to_group(&removed.passcode, &RoomEvent::RoomClosed)
            .await
        {
            tracing::warn!(passcode = %passcode, error = %e, "failed to broadcast room closed");
        }
        self.message_pusher.dissolve_group(&removed.passcode).await;

        tracing::info!(client_id = %caller, passcode = %passcode, "room ended by owner");
        Ok(())
    }
}
