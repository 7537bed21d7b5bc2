//! ドメイン層
//!
//! 値オブジェクト・エンティティ・イベントと、ドメインが外部に要求する
//! インターフェース（Repository / MessagePusher / RateLimiter）を定義します。

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod rate_limit;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, Room};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::RoomEvent;
pub use factory::PasscodeFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use rate_limit::{RateLimitAction, RateLimiter};
pub use repository::{Departure, JoinOutcome, RoomRepository};
pub use value_object::{ConnectionId, DisplayName, MessageText, Passcode, Timestamp};
