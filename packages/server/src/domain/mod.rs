//! Domain 層
//!
//! 接続・ルーム・チャット・タイピングのモデルと、
//! Infrastructure 層が実装するインターフェース（trait）を定義します。

pub mod chat_log;
pub mod compiler;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod room;
pub mod typing;
pub mod value_object;

pub use chat_log::{ChatLog, DEFAULT_CHAT_LOG_CAPACITY};
pub use compiler::{CompileOutput, CompileRequest, Compiler, Language};
pub use entity::{ChatMessage, Member};
pub use error::{CompileError, MessagePushError, RegistryError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ConnectionEntry, ConnectionRepository};
pub use room::{Delivery, RoomEvent, RoomState, RoomStats};
pub use typing::TypingTracker;
pub use value_object::{ConnectionId, DisplayName, RoomId, Timestamp};
