//! UseCase: ハートビート処理
//!
//! クライアントが生存していることを通知する。失敗は呼び出し元に返さない。

use std::sync::Arc;

use incog_shared::time::Clock;

use crate::domain::{ConnectionId, Passcode, RoomRepository, Timestamp};

/// ハートビートのユースケース
pub struct HeartbeatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl HeartbeatUseCase {
    /// 新しい HeartbeatUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 参加者の最終確認時刻とルームのアクティビティを更新する
    ///
    /// パスコードが不正、ルームが無い、参加していない場合は何もしない。
    pub async fn execute(&self, caller: &ConnectionId, passcode: &str) {
        let Ok(passcode) = Passcode::normalize(passcode) else {
            return;
        };
        let now = Timestamp::new(self.clock.now_millis());
        if let Err(e) = self
            .repository
            .touch_participant(&passcode, caller, now)
            .await
        {
            tracing::trace!(client_id = %caller, error = %e, "heartbeat ignored");
        }
    }
}
