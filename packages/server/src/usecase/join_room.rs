//! UseCase: ルームへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - join のたびに全メンバーへスナップショットが届くことを保証
//! - 参加者にだけチャット履歴が届くことを保証
//! - 1 つの接続が同時に 2 つのルームに入れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加、既存メンバーのいるルームへの参加
//! - 異常系：参加中の接続による 2 回目の join

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRepository, DisplayName, Member, RoomId},
    infrastructure::room::RoomDirectory,
};

use super::SessionError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（接続レジストリの抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// ルームアクターの対応表
    rooms: Arc<RoomDirectory>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>, rooms: Arc<RoomDirectory>) -> Self {
        Self { repository, rooms }
    }

    /// ルームへの参加を実行
    ///
    /// ルームが存在しない場合は作成される。表示名は検証せずそのまま使う。
    ///
    /// # Returns
    ///
    /// * `Ok(())` - join コマンドをルームに送った
    /// * `Err(SessionError::Registry(AlreadyInRoom))` - 既にルームに参加している
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        display_name: DisplayName,
    ) -> Result<(), SessionError> {
        // 1. 接続レジストリに参加を記録（1 接続 1 ルーム）
        self.repository
            .begin_join(&connection_id, room_id.clone(), display_name.clone())
            .await?;

        // 2. ルームアクターに join を送る
        self.rooms
            .join(room_id, Member::new(connection_id, display_name))
            .await;

        Ok(())
    }
}
