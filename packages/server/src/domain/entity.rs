//! エンティティ: Room と Participant

use std::collections::HashMap;

use super::value_object::{ConnectionId, DisplayName, Passcode, Timestamp};

/// 1 つの接続が 1 つの Room に参加していることを表すレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub display_name: DisplayName,
    pub last_seen_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, display_name: DisplayName, last_seen_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            last_seen_at,
        }
    }

    /// `true` when more than `idle_millis` passed since the participant was last seen.
    pub fn is_idle(&self, now: Timestamp, idle_millis: i64) -> bool {
        self.last_seen_at.millis_until(now) > idle_millis
    }
}

/// パスコードで識別されるチャットルーム
///
/// 所有者は一度設定されたら変更されません（所有者が切断しても同様）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub passcode: Passcode,
    pub owner: Option<ConnectionId>,
    pub last_activity_at: Timestamp,
    pub participants: HashMap<ConnectionId, Participant>,
}

impl Room {
    /// Create an empty room with no owner.
    pub fn new(passcode: Passcode, created_at: Timestamp) -> Self {
        Self {
            passcode,
            owner: None,
            last_activity_at: created_at,
            participants: HashMap::new(),
        }
    }

    /// Create a room already owned by `host`, who is also its first participant.
    pub fn with_host(passcode: Passcode, host: Participant, created_at: Timestamp) -> Self {
        let mut room = Self::new(passcode, created_at);
        room.owner = Some(host.id.clone());
        room.upsert_participant(host);
        room.stamp_activity(created_at);
        room
    }

    /// Set the owner if the room has none yet. Returns whether `id` became owner.
    pub fn claim_owner(&mut self, id: &ConnectionId) -> bool {
        if self.owner.is_some() {
            return false;
        }
        self.owner = Some(id.clone());
        true
    }

    pub fn is_owner(&self, id: &ConnectionId) -> bool {
        self.owner.as_ref() == Some(id)
    }

    pub fn is_participant(&self, id: &ConnectionId) -> bool {
        self.participants.contains_key(id)
    }

    /// Insert or overwrite the entry for the participant's connection.
    pub fn upsert_participant(&mut self, participant: Participant) {
        self.participants.insert(participant.id.clone(), participant);
    }

    /// Mark the participant as seen now, and the room as active.
    pub fn touch_participant(&mut self, id: &ConnectionId, now: Timestamp) -> Option<Participant> {
        let participant = self.participants.get_mut(id)?;
        participant.last_seen_at = participant.last_seen_at.max(now);
        let snapshot = participant.clone();
        self.stamp_activity(now);
        Some(snapshot)
    }

    pub fn remove_participant(&mut self, id: &ConnectionId) -> Option<Participant> {
        self.participants.remove(id)
    }

    /// Never moves `last_activity_at` backwards.
    pub fn stamp_activity(&mut self, now: Timestamp) {
        self.last_activity_at = self.last_activity_at.max(now);
    }

    /// Display names of every participant, sorted lexicographically.
    pub fn participant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .participants
            .values()
            .map(|p| p.display_name.as_str().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn is_expired(&self, now: Timestamp, ttl_millis: i64) -> bool {
        self.last_activity_at.millis_until(now) > ttl_millis
    }

    /// Connections whose participant has been idle longer than `idle_millis`.
    pub fn idle_participants(&self, now: Timestamp, idle_millis: i64) -> Vec<ConnectionId> {
        self.participants
            .values()
            .filter(|p| p.is_idle(now, idle_millis))
            .map(|p| p.id.clone())
            .collect()
    }
}
