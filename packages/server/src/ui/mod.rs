//! UI 層
//!
//! WebSocket と HTTP のエンドポイント。受信したイベントを DTO から
//! Domain Model に変換し、UseCase を呼び出す。

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
