//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ルームの全メンバー（送信者を含む）への配送と、ルームごとの連番
//!
//! ### なぜこのテストが必要か
//! - 他のルームのメンバーにメッセージが漏れないことを保証
//! - 連番が 1 から始まり、ルームごとに独立して増えることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：ルーム未参加、空のメッセージ、容量超過
//! - エッジケース：現在と異なるルーム名を指定した送信

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, MessageContent, Notification, SessionRepository, Timestamp,
};

use super::{broadcast::BroadcastDispatcher, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl SendMessageUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続
    /// * `room` - 指定された場合は現在のルームと一致する必要がある
    /// * `text` - メッセージ本文（前後の空白は除去される）
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - ルーム内でのメッセージ連番
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room: Option<&str>,
        text: String,
    ) -> Result<u64, SendMessageError> {
        let content = MessageContent::new(text).map_err(SendMessageError::InvalidMessage)?;

        let mut tables = self.repository.lock().await;
        let connection = tables
            .connections
            .lookup(&connection_id)
            .ok_or(SendMessageError::UnknownConnection(connection_id))?;
        let current = connection
            .current_room
            .clone()
            .ok_or(SendMessageError::NotInRoom)?;
        if room.is_some_and(|requested| requested != current.as_str()) {
            return Err(SendMessageError::NotInRoom);
        }
        let author = connection.identity.clone();

        let sequence = tables
            .rooms
            .next_sequence(&current)
            .map_err(|_| SendMessageError::NotInRoom)?;
        let message = ChatMessage {
            room: current.clone(),
            author,
            content,
            timestamp: Timestamp::now(),
            sequence,
        };
        let report =
            BroadcastDispatcher::to_room(&mut tables, &current, Notification::NewMessage(message));

        tracing::debug!(
            connection = %connection_id,
            room = %current,
            sequence,
            delivered = report.delivered,
            "message broadcast"
        );
        Ok(sequence)
    }
}
