//! Domain error types.

use thiserror::Error;

/// Errors raised while constructing value objects from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("passcode must be 8 digits, optionally written as ####-####")]
    InvalidPasscodeFormat,
    #[error("display name must be 1-32 characters of letters, digits, space, '_' or '-'")]
    InvalidDisplayName,
    #[error("message must be 1-500 characters after trimming")]
    InvalidMessage,
    #[error("connection id must not be empty")]
    EmptyConnectionId,
}

/// Repository エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
    #[error("room '{0}' already exists")]
    RoomCollision(String),
    #[error("participant '{0}' not found")]
    ParticipantNotFound(String),
    #[error("room '{0}' is owned by another connection")]
    NotOwner(String),
}

/// MessagePusher エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
    #[error("failed to encode event: {0}")]
    Encode(String),
}
