//! WebSocket frame DTOs.
//!
//! Client → server frames are tagged by `action`; server → client frames are
//! tagged by `type`. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// A request frame sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCommand {
    /// Echoed back in the reply so clients can correlate responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    #[serde(flatten)]
    pub action: ClientAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all_fields = "camelCase")]
pub enum ClientAction {
    CreateRoom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
    JoinRoom {
        passcode: String,
        display_name: String,
    },
    SendMessage {
        passcode: String,
        text: String,
    },
    Heartbeat {
        passcode: String,
    },
    EndRoom {
        passcode: String,
    },
}

impl ClientAction {
    pub fn name(&self) -> &'static str {
        match self {
            ClientAction::CreateRoom { .. } => "CreateRoom",
            ClientAction::JoinRoom { .. } => "JoinRoom",
            ClientAction::SendMessage { .. } => "SendMessage",
            ClientAction::Heartbeat { .. } => "Heartbeat",
            ClientAction::EndRoom { .. } => "EndRoom",
        }
    }
}

/// A frame sent by the server: replies to actions, and room events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First frame on every connection
    Connected { connection_id: String },
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
        result: ReplyResult,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
        code: String,
        message: String,
    },
    UserJoined {
        display_name: String,
        participants: Vec<String>,
    },
    PresenceList {
        participants: Vec<String>,
    },
    ReceiveMessage {
        display_name: String,
        text: String,
        utc: String,
    },
    UserLeft {
        display_name: String,
        participants: Vec<String>,
    },
    RoomClosed,
    KickedForInactivity,
}

/// Payload of a successful reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyResult {
    Created(CreateRoomReply),
    Joined(JoinRoomReply),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomReply {
    pub passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomReply {
    pub is_owner: bool,
    pub display_name: String,
}
