//! Infrastructure 層
//!
//! Domain 層のインターフェースの具体的な実装（インメモリのレジストリ、
//! WebSocket への送信、ルームアクター、外部コンパイルサービス）と DTO。

pub mod compiler;
pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod room;
