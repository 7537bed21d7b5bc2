//! UseCase 層
//!
//! クライアントからの 1 操作につき 1 つのユースケースを提供します。
//! 検証とレート制限は状態を変更する前に行います。

pub mod create_room;
pub mod disconnect_participant;
pub mod end_room;
pub mod error;
pub mod heartbeat;
pub mod join_room;
pub mod reserve_room;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use end_room::EndRoomUseCase;
pub use error::SessionError;
pub use heartbeat::HeartbeatUseCase;
pub use join_room::{JoinRoomOutput, JoinRoomUseCase};
pub use reserve_room::ReserveRoomUseCase;
pub use send_message::SendMessageUseCase;
