//! ドメイン層のエラー型

use thiserror::Error;

use super::RoomId;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが登録されていない
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    /// 送信に失敗した（受信側が閉じている）
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// 接続レジストリのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 登録されていない接続
    #[error("Connection '{0}' is not registered")]
    UnknownConnection(String),

    /// 既に別のルームに参加している
    #[error("Connection is already in room '{0}'")]
    AlreadyInRoom(RoomId),
}

/// コンパイル（コード実行）のエラー
///
/// 利用者に見せる分類ごとにバリアントを分けている。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// コードまたは言語が指定されていない
    #[error("Code and language are required")]
    InvalidRequest,

    #[error("Unsupported programming language: {0}")]
    UnsupportedLanguage(String),

    /// 外部サービスが制限時間内に応答しなかった
    #[error("Request timeout. Please try again.")]
    Timeout,

    /// 外部サービスがエラーを返した
    #[error("Compilation service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// 外部サービスに到達できなかった
    #[error("Failed to compile code. Please check your internet connection. ({0})")]
    Connectivity(String),
}

impl CompileError {
    /// エラーの分類名（クライアントに返す `errorKind`）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnsupportedLanguage(_) => "unsupported_language",
            Self::Timeout => "timeout",
            Self::Service { .. } => "service",
            Self::Connectivity(_) => "connectivity",
        }
    }
}
