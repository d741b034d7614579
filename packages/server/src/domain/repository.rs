//! Repository trait 定義
//!
//! 接続レジストリ（接続 ID → 表示名・参加中のルーム）へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{ConnectionId, DisplayName, RegistryError, RoomId};

/// 接続レジストリに保持される接続の情報
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionEntry {
    /// join 時に設定される表示名
    pub display_name: Option<DisplayName>,
    /// 参加中のルーム（最大 1 つ）
    pub current_room: Option<RoomId>,
}

/// Connection Repository trait
///
/// 接続のライフサイクル（接続 → join → leave → 切断）を管理する。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 接続を登録（トランスポート接続時）
    async fn register(&self, connection_id: ConnectionId);

    /// ルームへの参加を記録
    ///
    /// 既にルームに参加している場合は `AlreadyInRoom` を返す。
    async fn begin_join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        display_name: DisplayName,
    ) -> Result<(), RegistryError>;

    /// 参加中のルームを取得
    async fn current_room(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// ルームからの退出を記録し、退出したルームと表示名を返す
    ///
    /// ルームに参加していない場合は `None`（冪等）。
    async fn leave_room(&self, connection_id: &ConnectionId) -> Option<(RoomId, DisplayName)>;

    /// 接続を削除（トランスポート切断時）
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<ConnectionEntry>;

    /// ルームに参加中の接続数
    async fn count_joined(&self) -> usize;
}
