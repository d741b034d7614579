//! UseCase 層
//!
//! WebSocket / HTTP のハンドラーから呼ばれるアプリケーションの操作。
//! ルームの状態に対する変更は全て [`RoomDirectory`](crate::infrastructure::room::RoomDirectory)
//! 経由でルームアクターに送られる。

mod compile_code;
mod connect_participant;
mod disconnect_participant;
mod error;
mod get_room_stats;
mod join_room;
mod notify_typing;
mod relay_code;
mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use compile_code::CompileCodeUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::SessionError;
pub use get_room_stats::{GetRoomStatsUseCase, ServerStatus};
pub use join_room::JoinRoomUseCase;
pub use notify_typing::NotifyTypingUseCase;
pub use relay_code::RelayCodeUseCase;
pub use send_message::SendMessageUseCase;
