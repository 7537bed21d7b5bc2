//! Conversion logic between domain events and wire DTOs.

use crate::domain::{Passcode, RoomEvent};
use crate::infrastructure::dto::{
    http::{ErrorDetailDto, ErrorResponseDto, ReservedRoomDto},
    websocket::{CreateRoomReply, JoinRoomReply, ReplyResult, ServerMessage},
};
use crate::usecase::{JoinRoomOutput, SessionError};

// ========================================
// Domain Event → DTO
// ========================================

impl From<&RoomEvent> for ServerMessage {
    fn from(event: &RoomEvent) -> Self {
        match event.clone() {
            RoomEvent::UserJoined {
                display_name,
                participants,
            } => ServerMessage::UserJoined {
                display_name,
                participants,
            },
            RoomEvent::PresenceList { participants } => ServerMessage::PresenceList { participants },
            RoomEvent::ReceiveMessage {
                display_name,
                text,
                utc,
            } => ServerMessage::ReceiveMessage {
                display_name,
                text,
                utc,
            },
            RoomEvent::UserLeft {
                display_name,
                participants,
            } => ServerMessage::UserLeft {
                display_name,
                participants,
            },
            RoomEvent::RoomClosed => ServerMessage::RoomClosed,
            RoomEvent::KickedForInactivity => ServerMessage::KickedForInactivity,
        }
    }
}

// ========================================
// UseCase result → DTO
// ========================================

impl From<Passcode> for CreateRoomReply {
    fn from(passcode: Passcode) -> Self {
        Self {
            passcode: passcode.into_string(),
        }
    }
}

impl From<Passcode> for ReservedRoomDto {
    fn from(passcode: Passcode) -> Self {
        Self {
            passcode: passcode.into_string(),
        }
    }
}

impl From<JoinRoomOutput> for JoinRoomReply {
    fn from(output: JoinRoomOutput) -> Self {
        Self {
            is_owner: output.is_owner,
            display_name: output.display_name,
        }
    }
}

impl ServerMessage {
    /// Reply to a command, successful or not.
    pub fn reply(request_id: Option<u64>, result: Result<ReplyResult, SessionError>) -> Self {
        match result {
            Ok(result) => ServerMessage::Ok { request_id, result },
            Err(err) => ServerMessage::Error {
                request_id,
                code: err.code().to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<&SessionError> for ErrorResponseDto {
    fn from(err: &SessionError) -> Self {
        Self {
            error: ErrorDetailDto {
                code: err.code().to_string(),
                message: err.to_string(),
            },
        }
    }
}
