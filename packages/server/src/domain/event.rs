//! Events the core asks the transport to deliver.
//!
//! The domain never serializes these; the transport implementation maps them
//! onto its own wire format.

/// Room-scoped notification delivered to a group or to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    UserJoined {
        display_name: String,
        participants: Vec<String>,
    },
    PresenceList {
        participants: Vec<String>,
    },
    ReceiveMessage {
        display_name: String,
        /// HTML-escaped message body
        text: String,
        /// UTC RFC 3339 with millisecond precision
        utc: String,
    },
    UserLeft {
        display_name: String,
        participants: Vec<String>,
    },
    RoomClosed,
    KickedForInactivity,
}

impl RoomEvent {
    /// Event name as seen by clients.
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::UserJoined { .. } => "UserJoined",
            RoomEvent::PresenceList { .. } => "PresenceList",
            RoomEvent::ReceiveMessage { .. } => "ReceiveMessage",
            RoomEvent::UserLeft { .. } => "UserLeft",
            RoomEvent::RoomClosed => "RoomClosed",
            RoomEvent::KickedForInactivity => "KickedForInactivity",
        }
    }
}
