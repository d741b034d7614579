//! ルームの実行基盤
//!
//! ルームごとに 1 つのアクター（tokio タスク）がコマンドのキューを順に処理し、
//! ルームの状態（メンバー・チャット履歴・タイピング状態）を唯一所有する。
//! [`RoomDirectory`] はルーム ID からアクターへのハンドルを引く。

mod actor;
mod alarm;
mod directory;

pub use actor::RoomCommand;
pub use alarm::TypingAlarms;
pub use directory::RoomDirectory;
