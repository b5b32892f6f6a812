//! Infrastructure layer
//!
//! Repository 実装、外部の認証情報検証、WebSocket / HTTP の DTO を提供します。

pub mod dto;
pub mod identity;
pub mod repository;
