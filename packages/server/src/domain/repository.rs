//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 原子性
//!
//! 1 つの Room に対する複合操作（参加・退出・失効チェック付き削除など）は
//! それぞれ 1 メソッドで提供され、その Room について原子的に実行されます。
//! 異なる Room に対する操作は互いにブロックしません。

use async_trait::async_trait;

use super::{
    entity::{Participant, Room},
    error::RepositoryError,
    value_object::{ConnectionId, Passcode, Timestamp},
};

/// `join_room` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// 参加者が所有者になったかどうか
    pub is_owner: bool,
    /// この参加によって Room が新規作成されたかどうか
    pub room_created: bool,
    /// 参加後の参加者名（辞書順）
    pub participants: Vec<String>,
}

/// 参加者が Room から外れた結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub passcode: Passcode,
    pub participant: Participant,
    /// 退出後に残っている参加者名（辞書順）
    pub participants: Vec<String>,
}

/// Room Repository trait
///
/// UseCase 層とバックグラウンドタスクはこの trait に依存し、
/// Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// パスコードの Room が存在するか
    async fn exists(&self, passcode: &Passcode) -> bool;

    /// Room を登録（既に存在する場合は `RoomCollision`）
    async fn create_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// Room のスナップショットを取得（存在しない場合は `RoomNotFound`）
    async fn get_room(&self, passcode: &Passcode) -> Result<Room, RepositoryError>;

    /// Room のスナップショットを取得（存在しない場合は `None`）
    async fn find_room(&self, passcode: &Passcode) -> Option<Room>;

    /// Room を削除し、削除した Room を返す
    async fn remove_room(&self, passcode: &Passcode) -> Option<Room>;

    /// 呼び出し元が所有者であれば Room を削除
    ///
    /// 所有者の確認と削除は同じエントリのロック下で行われる。
    /// Room が無ければ `Ok(None)`、他の所有者の Room であれば `NotOwner`。
    async fn remove_room_if_owner(
        &self,
        passcode: &Passcode,
        caller: &ConnectionId,
    ) -> Result<Option<Room>, RepositoryError>;

    /// 全 Room のスナップショット
    async fn list_rooms(&self) -> Vec<Room>;

    /// 全 Room 数
    async fn count_rooms(&self) -> usize;

    /// 参加者を Room に追加する（Room が無ければ作成、所有者が無ければ所有者にする）
    async fn join_room(
        &self,
        passcode: &Passcode,
        participant: Participant,
        now: Timestamp,
    ) -> JoinOutcome;

    /// 参加者の最終確認時刻と Room の最終アクティビティを更新
    async fn touch_participant(
        &self,
        passcode: &Passcode,
        client_id: &ConnectionId,
        now: Timestamp,
    ) -> Result<Participant, RepositoryError>;

    /// 参加者を Room から削除し、Room のアクティビティを更新
    async fn remove_participant(
        &self,
        passcode: &Passcode,
        client_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<Departure>;

    /// 参加者が今もアイドルであれば削除（Room のアクティビティは更新しない）
    async fn remove_idle_participant(
        &self,
        passcode: &Passcode,
        client_id: &ConnectionId,
        now: Timestamp,
        idle_millis: i64,
    ) -> Option<Departure>;

    /// Room が今も失効していれば削除
    async fn remove_expired_room(
        &self,
        passcode: &Passcode,
        now: Timestamp,
        ttl_millis: i64,
    ) -> Option<Room>;

    /// 指定クライアントが参加している全 Room のパスコード
    async fn rooms_of(&self, client_id: &ConnectionId) -> Vec<Passcode>;
}
