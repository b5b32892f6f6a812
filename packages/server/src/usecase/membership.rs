//! UseCase: Presence & Membership Manager
//!
//! ルームの作成・参加・退出と、切断時の後片付けを扱います。
//! 状態遷移とその結果の通知は一つのセッションロックの中で行うため、
//! 他の接続から遷移の途中状態が見えることはありません。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MembershipManager の create / join / leave / disconnect_cleanup
//! - 各操作で誰にどの通知がどの順序で届くか
//!
//! ### どのような状況を想定しているか
//! - 正常系：Tavern への参加、Cellar への移動、退出、切断
//! - 異常系：存在しないルーム、不正なルーム名、未登録の接続
//! - エッジケース：同じルームへの再参加、別のルーム名を指定した退出

use std::sync::Arc;

use crate::domain::{
    ConnectionId, JoinOutcome, Notification, RoomName, SessionRepository, SessionTables,
    Timestamp,
};

use super::{broadcast::BroadcastDispatcher, error::RoomError, query::online_identities};

/// ルーム参加状態を管理するユースケース
pub struct MembershipManager {
    repository: Arc<dyn SessionRepository>,
}

impl MembershipManager {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// ルームを作成（既に存在する場合はそのまま）
    ///
    /// 作成者はルームに参加しません。
    pub async fn create(
        &self,
        connection_id: ConnectionId,
        room: &str,
    ) -> Result<RoomName, RoomError> {
        let mut tables = self.repository.lock().await;
        let creator = tables
            .connections
            .lookup(&connection_id)
            .ok_or(RoomError::UnknownConnection(connection_id))?
            .identity
            .clone();

        let (room, created) = tables
            .rooms
            .create_or_get(room, &creator, Timestamp::now())
            .map(|(room, created)| (room.name.clone(), created))?;

        let text = if created {
            tracing::info!(room = %room, creator = %creator.username, "room created");
            format!("Room {room} created")
        } else {
            format!("Room {room} already exists")
        };
        BroadcastDispatcher::to_connection(
            &mut tables,
            &connection_id,
            Notification::system(Some(room.clone()), text),
        );
        Ok(room)
    }

    /// ルームに参加（現在のルームからは同じ遷移の中で退出）
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        room: &str,
    ) -> Result<JoinOutcome, RoomError> {
        let mut tables = self.repository.lock().await;
        let outcome = tables.join(&connection_id, room)?;
        let (left, joined) = match &outcome {
            JoinOutcome::Unchanged => return Ok(JoinOutcome::Unchanged),
            JoinOutcome::Joined { left, joined } => (left.clone(), joined.clone()),
        };

        if let Some(left) = &left {
            announce_departure(&mut tables, &connection_id, left);
        }

        let member_count = tables
            .rooms
            .get(joined.as_str())
            .map_or(0, |room| room.member_count());
        BroadcastDispatcher::to_connection(
            &mut tables,
            &connection_id,
            Notification::RoomJoined {
                room: joined.clone(),
                member_count,
            },
        );
        let text = format!("{} joined the room", username(&tables, &connection_id));
        BroadcastDispatcher::to_room_except(
            &mut tables,
            &joined,
            Some(&connection_id),
            Notification::system(Some(joined.clone()), text),
        );
        BroadcastDispatcher::rooms_list_to_all(&mut tables);

        tracing::debug!(
            connection = %connection_id,
            room = %joined,
            member_count,
            "joined room"
        );
        Ok(outcome)
    }

    /// 現在のルームから退出
    ///
    /// ルームに属していない場合、または `room` が現在のルームと異なる場合は何もしません。
    pub async fn leave(
        &self,
        connection_id: ConnectionId,
        room: Option<&str>,
    ) -> Result<Option<RoomName>, RoomError> {
        let mut tables = self.repository.lock().await;
        let current = tables
            .connections
            .lookup(&connection_id)
            .ok_or(RoomError::UnknownConnection(connection_id))?
            .current_room
            .clone();
        let matches = match (&current, room) {
            (Some(current), Some(requested)) => current.as_str() == requested,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if !matches {
            return Ok(None);
        }

        let left = tables.leave(&connection_id)?;
        if let Some(left) = &left {
            announce_departure(&mut tables, &connection_id, left);
            BroadcastDispatcher::rooms_list_to_all(&mut tables);
            tracing::debug!(connection = %connection_id, room = %left, "left room");
        }
        Ok(left)
    }

    /// 切断時の後片付け（失敗しない）
    ///
    /// 既に片付け済みの接続なら false を返します。
    pub async fn disconnect_cleanup(&self, connection_id: ConnectionId) -> bool {
        let mut tables = self.repository.lock().await;
        let Some(disconnected) = tables.disconnect(&connection_id) else {
            return false;
        };

        if let Some(left) = &disconnected.left {
            let text = format!("{} left the room", disconnected.connection.identity.username);
            BroadcastDispatcher::to_room(
                &mut tables,
                left,
                Notification::system(Some(left.clone()), text),
            );
            BroadcastDispatcher::rooms_list_to_all(&mut tables);
        }
        let users = online_identities(&tables, None);
        BroadcastDispatcher::to_all(&mut tables, Notification::UsersOnline { room: None, users });

        tracing::info!(
            connection = %connection_id,
            user = %disconnected.connection.identity.username,
            room = ?disconnected.left.as_ref().map(|room| room.as_str()),
            online = tables.connections.len(),
            "connection cleaned up"
        );
        true
    }
}

/// 退出した本人に room_left、残ったメンバーにシステムメッセージを送る
fn announce_departure(tables: &mut SessionTables, connection_id: &ConnectionId, left: &RoomName) {
    BroadcastDispatcher::to_connection(
        tables,
        connection_id,
        Notification::RoomLeft { room: left.clone() },
    );
    let text = format!("{} left the room", username(tables, connection_id));
    BroadcastDispatcher::to_room(tables, left, Notification::system(Some(left.clone()), text));
}

fn username(tables: &SessionTables, connection_id: &ConnectionId) -> String {
    tables
        .connections
        .lookup(connection_id)
        .map(|connection| connection.identity.username.clone())
        .unwrap_or_default()
}
