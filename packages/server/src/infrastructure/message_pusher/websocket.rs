//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - パスコードで命名されたグループのメンバー管理
//! - ドメインイベントを JSON フレームにエンコードして送信（push_to, broadcast_to_group）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! ロックは必ず `groups` → `clients` の順で取得します。

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Passcode, PusherChannel, RoomEvent},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のクライアントと対応する WebSocket sender のマップ
/// - `groups`: グループ名（パスコード）とメンバーの接続 ID 集合のマップ
#[derive(Default)]
pub struct WebSocketMessagePusher {
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
    groups: Arc<Mutex<HashMap<String, HashSet<String>>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// グループの現在のメンバー（ソート済み）
    pub async fn members_of(&self, group: &Passcode) -> Vec<String> {
        let groups = self.groups.lock().await;
        let mut members: Vec<String> = groups
            .get(group.as_str())
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// 登録中のクライアント数
    pub async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(event: &RoomEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(event))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!(client_id = %client_id, "client registered to MessagePusher");
        clients.insert(client_id.into_string(), sender);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id.as_str());
        tracing::debug!(client_id = %client_id, "client unregistered from MessagePusher");
    }

    async fn add_to_group(&self, client_id: &ConnectionId, group: &Passcode) {
        let mut groups = self.groups.lock().await;
        groups
            .entry(group.as_str().to_string())
            .or_default()
            .insert(client_id.as_str().to_string());
    }

    async fn remove_from_group(&self, client_id: &ConnectionId, group: &Passcode) {
        let mut groups = self.groups.lock().await;
        if let Some(members) = groups.get_mut(group.as_str()) {
            members.remove(client_id.as_str());
            if members.is_empty() {
                groups.remove(group.as_str());
            }
        }
    }

    async fn remove_from_all_groups(&self, client_id: &ConnectionId) {
        let mut groups = self.groups.lock().await;
        groups.retain(|_, members| {
            members.remove(client_id.as_str());
            !members.is_empty()
        });
    }

    async fn dissolve_group(&self, group: &Passcode) {
        let mut groups = self.groups.lock().await;
        groups.remove(group.as_str());
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(client_id.as_str())
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.as_str().to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!(client_id = %client_id, event = event.name(), "pushed event");
        Ok(())
    }

    async fn broadcast_to_group(
        &self,
        group: &Passcode,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let groups = self.groups.lock().await;
        let Some(members) = groups.get(group.as_str()) else {
            return Ok(());
        };
        let clients = self.clients.lock().await;

        for member in members {
            match clients.get(member) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!(client_id = %member, error = %e, "failed to push event");
                    }
                }
                None => {
                    tracing::warn!(client_id = %member, "group member not registered, skipping");
                }
            }
        }
        tracing::debug!(
            passcode = %group,
            event = event.name(),
            members = members.len(),
            "broadcasted event to group"
        );
        Ok(())
    }
}
