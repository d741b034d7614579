//! Shared application state.

use std::sync::Arc;

use kyodo_shared::time::Clock;

use crate::usecase::{
    CompileCodeUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
    GetRoomStatsUseCase, JoinRoomUseCase, NotifyTypingUseCase, RelayCodeUseCase,
    SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（退出・切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// RelayCodeUseCase（コード中継のユースケース）
    pub relay_code_usecase: Arc<RelayCodeUseCase>,
    /// SendMessageUseCase（チャット送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// NotifyTypingUseCase（タイピング通知のユースケース）
    pub notify_typing_usecase: Arc<NotifyTypingUseCase>,
    /// GetRoomStatsUseCase（統計取得のユースケース）
    pub get_room_stats_usecase: Arc<GetRoomStatsUseCase>,
    /// CompileCodeUseCase（コンパイルのユースケース）
    pub compile_code_usecase: Arc<CompileCodeUseCase>,
    /// ヘルスチェックの時刻
    pub clock: Arc<dyn Clock>,
}
