//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// 呼び出し元に返すセッション操作のエラー
///
/// どのエラーも状態を変更する前に検出されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid passcode format")]
    InvalidFormat,
    #[error("display name invalid")]
    InvalidName,
    #[error("message length invalid")]
    InvalidMessage,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("room not found")]
    RoomNotFound,
    #[error("not a participant")]
    NotAParticipant,
    #[error("only the host can end the room")]
    NotOwner,
    #[error("could not create room, please retry")]
    Collision,
}

impl SessionError {
    /// Stable wire code.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidFormat => "INVALID_FORMAT",
            SessionError::InvalidName => "INVALID_NAME",
            SessionError::InvalidMessage => "INVALID_MESSAGE",
            SessionError::RateLimited => "RATE_LIMITED",
            SessionError::RoomNotFound => "ROOM_NOT_FOUND",
            SessionError::NotAParticipant => "NOT_A_PARTICIPANT",
            SessionError::NotOwner => "NOT_OWNER",
            SessionError::Collision => "INTERNAL",
        }
    }
}

impl From<ValueObjectError> for SessionError {
    fn from(err: ValueObjectError) -> Self {
        match err {
            ValueObjectError::InvalidPasscodeFormat | ValueObjectError::EmptyConnectionId => {
                SessionError::InvalidFormat
            }
            ValueObjectError::InvalidDisplayName => SessionError::InvalidName,
            ValueObjectError::InvalidMessage => SessionError::InvalidMessage,
        }
    }
}

impl From<RepositoryError> for SessionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RoomNotFound(_) => SessionError::RoomNotFound,
            RepositoryError::RoomCollision(_) => SessionError::Collision,
            RepositoryError::ParticipantNotFound(_) => SessionError::NotAParticipant,
            RepositoryError::NotOwner(_) => SessionError::NotOwner,
        }
    }
}
