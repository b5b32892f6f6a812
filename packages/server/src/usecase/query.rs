//! UseCase: 一覧取得（ルーム一覧・オンラインユーザー一覧）
//!
//! 結果は要求元の接続にだけ返します。

use std::{collections::BTreeMap, sync::Arc};

use crate::domain::{ConnectionId, Identity, Notification, SessionRepository, SessionTables};

use super::{broadcast::BroadcastDispatcher, error::RoomError};

/// 一覧取得のユースケース
pub struct QueryUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl QueryUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// アクティブなルーム一覧を要求元へ送る
    pub async fn list_rooms(&self, connection_id: ConnectionId) -> Result<(), RoomError> {
        let mut tables = self.repository.lock().await;
        if tables.connections.lookup(&connection_id).is_none() {
            return Err(RoomError::UnknownConnection(connection_id));
        }
        let rooms = tables.rooms.list_active();
        BroadcastDispatcher::to_connection(
            &mut tables,
            &connection_id,
            Notification::RoomsList { rooms },
        );
        Ok(())
    }

    /// オンラインユーザー一覧を要求元へ送る
    ///
    /// 存在するルームを指定した場合はそのメンバー、それ以外は全接続のユーザー。
    pub async fn online_users(
        &self,
        connection_id: ConnectionId,
        room: Option<&str>,
    ) -> Result<(), RoomError> {
        let mut tables = self.repository.lock().await;
        if tables.connections.lookup(&connection_id).is_none() {
            return Err(RoomError::UnknownConnection(connection_id));
        }
        let room = room
            .and_then(|name| tables.rooms.get(name))
            .map(|room| room.name.clone());
        let users = online_identities(&tables, room.as_ref().map(|r| r.as_str()));
        BroadcastDispatcher::to_connection(
            &mut tables,
            &connection_id,
            Notification::UsersOnline { room, users },
        );
        Ok(())
    }
}

/// 接続中のユーザー（同一ユーザーの複数接続は一人として数える）をユーザー名順で返す
///
/// Draining の接続も後片付けで登録から外れるまでは数える（ルームの人数と同じ基準）。
pub(crate) fn online_identities(tables: &SessionTables, room: Option<&str>) -> Vec<Identity> {
    let mut users: BTreeMap<(String, String), Identity> = BTreeMap::new();
    let connections = tables.connections.iter().filter(|connection| match room {
        Some(room) => connection
            .current_room
            .as_ref()
            .is_some_and(|current| current.as_str() == room),
        None => true,
    });
    for connection in connections {
        let identity = &connection.identity;
        users
            .entry((identity.username.clone(), identity.user_id.clone()))
            .or_insert_with(|| identity.clone());
    }
    users.into_values().collect()
}
