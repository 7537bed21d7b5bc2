//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（エスケープ、ブロードキャスト、最終確認時刻の更新）
//!
//! ### なぜこのテストが必要か
//! - 本文が HTML エスケープされてから配信されることを保証
//! - 参加していないルームへの送信が拒否されることを確認
//! - 送信によってアイドル判定・失効判定の時刻が更新されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト（送信者自身にも届く）
//! - 異常系：パスコード形式エラー、本文の長さエラー、ルーム不在、非参加者

use std::sync::Arc;

use incog_shared::time::{Clock, timestamp_to_utc_rfc3339};

use crate::domain::{
    ConnectionId, MessagePusher, MessageText, Passcode, RepositoryError, RoomEvent,
    RoomRepository, Timestamp,
};

use super::error::SessionError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `caller` - メッセージ送信者の接続 ID
    /// * `passcode` - 送信先ルームのパスコード（未正規化）
    /// * `text` - メッセージ本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - ルームの全員（送信者を含む）に配信した
    /// * `Err(SessionError)` - 送信失敗
    pub async fn execute(
        &self,
        caller: &ConnectionId,
        passcode: &str,
        text: &str,
    ) -> Result<(), SessionError> {
        let passcode = Passcode::normalize(passcode)?;
        let text = MessageText::new(text)?;

        // 1. 参加者の最終確認時刻とルームのアクティビティを更新
        let now = Timestamp::new(self.clock.now_millis());
        let sender = self
            .repository
            .touch_participant(&passcode, caller, now)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomNotFound(_) => SessionError::RoomNotFound,
                _ => SessionError::NotAParticipant,
            })?;

        // 2. エスケープ済みの本文をブロードキャスト
        let event = RoomEvent::ReceiveMessage {
            display_name: sender.display_name.into_string(),
            text: text.escaped(),
            utc: timestamp_to_utc_rfc3339(now.value()),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast_to_group(&passcode, &event)
            .await
        {
            tracing::warn!(passcode = %passcode, error = %e, "failed to broadcast message");
        }

        tracing::debug!(client_id = %caller, passcode = %passcode, "message sent");
        Ok(())
    }
}
