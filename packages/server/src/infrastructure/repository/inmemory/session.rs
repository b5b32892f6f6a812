//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! 接続一覧（ConnectionRegistry）とルーム一覧（RoomDirectory）を
//! 一つの `tokio::sync::Mutex` で保護します。
//!
//! ## ロックの粒度
//!
//! 全ルーム共通の粗いロックです。ルーム数が少ない前提では十分で、
//! 接続一覧とルーム一覧をまたぐ更新の原子性を簡単に保証できます。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{SessionGuard, SessionRepository, SessionTables};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    tables: Mutex<SessionTables>,
}

impl InMemorySessionRepository {
    /// 空の InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(SessionTables::new()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn lock<'a>(&'a self) -> SessionGuard<'a> {
        self.tables.lock().await
    }
}
