//! UseCase: 接続登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUseCase::execute() メソッド
//! - 認証済みの接続を登録し、歓迎メッセージ・ルーム一覧・オンライン一覧を送ること
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - 異常系：既に登録済みの ConnectionId

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionIdFactory, Identity, Notification, Outbound, SessionRepository,
    Timestamp,
};

use super::{broadcast::BroadcastDispatcher, error::ConnectError, query::online_identities};

/// 接続登録のユースケース
pub struct ConnectUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl ConnectUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 新しい ConnectionId で接続を登録
    pub async fn execute(
        &self,
        identity: Identity,
        outbound: Outbound,
    ) -> Result<ConnectionId, ConnectError> {
        let connection_id = ConnectionIdFactory::generate();
        self.register(connection_id, identity, outbound).await?;
        Ok(connection_id)
    }

    /// 指定した ConnectionId で接続を登録
    ///
    /// # Returns
    ///
    /// * `Err(ConnectError::DuplicateConnection)` - ID が既に使われている
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        identity: Identity,
        outbound: Outbound,
    ) -> Result<(), ConnectError> {
        let mut tables = self.repository.lock().await;
        tables
            .register(connection_id, identity.clone(), outbound, Timestamp::now())?;

        // 1. 本人へ歓迎メッセージと現在のルーム一覧
        BroadcastDispatcher::to_connection(
            &mut tables,
            &connection_id,
            Notification::Welcome {
                identity: identity.clone(),
            },
        );
        let rooms = tables.rooms.list_active();
        BroadcastDispatcher::to_connection(
            &mut tables,
            &connection_id,
            Notification::RoomsList { rooms },
        );

        // 2. 全員へオンライン一覧
        let users = online_identities(&tables, None);
        BroadcastDispatcher::to_all(&mut tables, Notification::UsersOnline { room: None, users });

        tracing::info!(
            connection = %connection_id,
            user = %identity.username,
            online = tables.connections.len(),
            "connection registered"
        );
        Ok(())
    }
}
