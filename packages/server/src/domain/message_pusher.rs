//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ配信（通知）のインターフェースを定義します。
//! 接続・グループ・シリアライズ形式の詳細は Infrastructure 層が扱います。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    event::RoomEvent,
    value_object::{ConnectionId, Passcode},
};

/// 接続ごとの送信チャンネル（エンコード済みフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// グループは Room のパスコードで命名されます。
///
/// ## 配信の保証
///
/// - `push_to`: 宛先が存在しない場合はエラー
/// - `broadcast_to_group`: ベストエフォート。切断済みのメンバーはスキップされる
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// クライアントを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// クライアントをグループに追加
    async fn add_to_group(&self, client_id: &ConnectionId, group: &Passcode);

    /// クライアントをグループから削除
    async fn remove_from_group(&self, client_id: &ConnectionId, group: &Passcode);

    /// クライアントを全てのグループから削除
    async fn remove_from_all_groups(&self, client_id: &ConnectionId);

    /// グループを解散（メンバー全員を外す）
    async fn dissolve_group(&self, group: &Passcode);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;

    /// グループの全メンバーにイベントを送信
    async fn broadcast_to_group(
        &self,
        group: &Passcode,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;
}
