//! Server state and connection management.

use std::sync::Arc;

use crate::{
    domain::MessagePusher,
    usecase::{
        CreateRoomUseCase, DisconnectParticipantUseCase, EndRoomUseCase, HeartbeatUseCase,
        JoinRoomUseCase, ReserveRoomUseCase, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// MessagePusher（接続の登録に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub heartbeat_usecase: Arc<HeartbeatUseCase>,
    pub end_room_usecase: Arc<EndRoomUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// `POST /rooms`
    pub reserve_room_usecase: Arc<ReserveRoomUseCase>,
}
