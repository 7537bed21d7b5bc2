//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `DashMap` をインメモリ DB として使用します。
//!
//! ## ロックの粒度
//!
//! DashMap はシャード単位のロックを持つため、異なる Room への操作は
//! ほとんどの場合互いにブロックしません。1 つの Room への複合操作は
//! そのエントリのガードを保持したまま行い、`.await` を跨いでガードを保持しません。

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

use crate::domain::{
    ConnectionId, Departure, JoinOutcome, Participant, Passcode, RepositoryError, Room,
    RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryRoomRepository {
    /// パスコード → Room
    rooms: DashMap<Passcode, Room>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn exists(&self, passcode: &Passcode) -> bool {
        self.rooms.contains_key(passcode)
    }

    async fn create_room(&self, room: Room) -> Result<(), RepositoryError> {
        match self.rooms.entry(room.passcode.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::RoomCollision(
                room.passcode.into_string(),
            )),
            Entry::Vacant(vacant) => {
                vacant.insert(room);
                Ok(())
            }
        }
    }

    async fn get_room(&self, passcode: &Passcode) -> Result<Room, RepositoryError> {
        self.rooms
            .get(passcode)
            .map(|room| room.value().clone())
            .ok_or_else(|| RepositoryError::RoomNotFound(passcode.as_str().to_string()))
    }

    async fn find_room(&self, passcode: &Passcode) -> Option<Room> {
        self.rooms.get(passcode).map(|room| room.value().clone())
    }

    async fn remove_room(&self, passcode: &Passcode) -> Option<Room> {
        self.rooms.remove(passcode).map(|(_, room)| room)
    }

    async fn remove_room_if_owner(
        &self,
        passcode: &Passcode,
        caller: &ConnectionId,
    ) -> Result<Option<Room>, RepositoryError> {
        match self.rooms.entry(passcode.clone()) {
            Entry::Vacant(_) => Ok(None),
            Entry::Occupied(occupied) if occupied.get().is_owner(caller) => {
                Ok(Some(occupied.remove()))
            }
            Entry::Occupied(_) => Err(RepositoryError::NotOwner(passcode.as_str().to_string())),
        }
    }

    async fn list_rooms(&self) -> Vec<Room> {
        self.rooms.iter().map(|room| room.value().clone()).collect()
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.len()
    }

    async fn join_room(
        &self,
        passcode: &Passcode,
        participant: Participant,
        now: Timestamp,
    ) -> JoinOutcome {
        let mut room_created = false;
        let mut room = self.rooms.entry(passcode.clone()).or_insert_with(|| {
            room_created = true;
            Room::new(passcode.clone(), now)
        });

        let is_owner = room.claim_owner(&participant.id);
        room.upsert_participant(participant);
        room.stamp_activity(now);

        JoinOutcome {
            is_owner,
            room_created,
            participants: room.participant_names(),
        }
    }

    async fn touch_participant(
        &self,
        passcode: &Passcode,
        client_id: &ConnectionId,
        now: Timestamp,
    ) -> Result<Participant, RepositoryError> {
        let mut room = self
            .rooms
            .get_mut(passcode)
            .ok_or_else(|| RepositoryError::RoomNotFound(passcode.as_str().to_string()))?;

        room.touch_participant(client_id, now)
            .ok_or_else(|| RepositoryError::ParticipantNotFound(client_id.as_str().to_string()))
    }

    async fn remove_participant(
        &self,
        passcode: &Passcode,
        client_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<Departure> {
        let mut room = self.rooms.get_mut(passcode)?;
        let participant = room.remove_participant(client_id)?;
        room.stamp_activity(now);

        Some(Departure {
            passcode: passcode.clone(),
            participant,
            participants: room.participant_names(),
        })
    }

    async fn remove_idle_participant(
        &self,
        passcode: &Passcode,
        client_id: &ConnectionId,
        now: Timestamp,
        idle_millis: i64,
    ) -> Option<Departure> {
        let mut room = self.rooms.get_mut(passcode)?;
        let still_idle = room
            .participants
            .get(client_id)
            .is_some_and(|p| p.is_idle(now, idle_millis));
        if !still_idle {
            return None;
        }
        let participant = room.remove_participant(client_id)?;

        Some(Departure {
            passcode: passcode.clone(),
            participant,
            participants: room.participant_names(),
        })
    }

    async fn remove_expired_room(
        &self,
        passcode: &Passcode,
        now: Timestamp,
        ttl_millis: i64,
    ) -> Option<Room> {
        self.rooms
            .remove_if(passcode, |_, room| room.is_expired(now, ttl_millis))
            .map(|(_, room)| room)
    }

    async fn rooms_of(&self, client_id: &ConnectionId) -> Vec<Passcode> {
        self.rooms
            .iter()
            .filter(|room| room.is_participant(client_id))
            .map(|room| room.key().clone())
            .collect()
    }
}
