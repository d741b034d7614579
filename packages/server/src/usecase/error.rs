//! UseCase 層のエラー型
//!
//! いずれもプロトコルの誤用で、要求した接続の外には影響しない。
//! ハンドラーはログに残して無視する。

use thiserror::Error;

use crate::domain::{RegistryError, RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// ルームに参加していない接続からの操作
    #[error("Connection is not in a room")]
    NotInRoom,

    /// 参加中のルームと異なるルームを指定した操作
    #[error("Connection is in room '{joined}', not '{requested}'")]
    RoomMismatch { joined: RoomId, requested: RoomId },

    /// 不正な接続 ID
    #[error("Invalid connection id '{0}'")]
    InvalidConnectionId(String),

    /// ルームが既に停止している
    #[error("Room '{0}' is not active")]
    RoomUnavailable(RoomId),
}
