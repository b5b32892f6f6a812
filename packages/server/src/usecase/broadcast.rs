//! Broadcast Dispatcher
//!
//! 通知を各接続の送信キュー（FIFO）に積むだけで、ネットワーク送信は待ちません。
//! 呼び出し側はセッションロックを保持したまま使うため、同じ接続に届く通知の
//! 順序は状態遷移の順序と一致します。
//!
//! 送信キューが閉じている接続（TransportSendFailure）はログに残して読み飛ばし、
//! 他の受信者への配送には影響しません。

use crate::domain::{
    ConnectionId, Delivery, Notification, RoomName, SessionTables,
};

/// 配送結果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub dropped: usize,
}

impl DeliveryReport {
    fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Enqueued => self.delivered += 1,
            Delivery::Dropped => self.dropped += 1,
        }
    }
}

pub struct BroadcastDispatcher;

impl BroadcastDispatcher {
    /// 一つの接続へ配送
    pub fn to_connection(
        tables: &mut SessionTables,
        connection_id: &ConnectionId,
        notification: Notification,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        match tables.connections.lookup_mut(connection_id) {
            Some(connection) => report.record(connection.deliver(notification)),
            None => report.dropped += 1,
        }
        report
    }

    /// ルームの全メンバーへ配送
    pub fn to_room(
        tables: &mut SessionTables,
        room: &RoomName,
        notification: Notification,
    ) -> DeliveryReport {
        Self::to_room_except(tables, room, None, notification)
    }

    /// ルームのメンバーのうち `except` 以外へ配送
    pub fn to_room_except(
        tables: &mut SessionTables,
        room: &RoomName,
        except: Option<&ConnectionId>,
        notification: Notification,
    ) -> DeliveryReport {
        let members: Vec<ConnectionId> = match tables.rooms.get(room.as_str()) {
            Some(room) => room
                .members()
                .filter(|id| Some(*id) != except)
                .copied()
                .collect(),
            None => return DeliveryReport::default(),
        };
        Self::deliver_all(tables, members, notification)
    }

    /// 全ての接続へ配送
    pub fn to_all(tables: &mut SessionTables, notification: Notification) -> DeliveryReport {
        let recipients = tables.connections.ids();
        Self::deliver_all(tables, recipients, notification)
    }

    /// 現在のアクティブなルーム一覧を全ての接続へ配送
    pub fn rooms_list_to_all(tables: &mut SessionTables) -> DeliveryReport {
        let rooms = tables.rooms.list_active();
        Self::to_all(tables, Notification::RoomsList { rooms })
    }

    fn deliver_all(
        tables: &mut SessionTables,
        recipients: Vec<ConnectionId>,
        notification: Notification,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for id in recipients {
            match tables.connections.lookup_mut(&id) {
                Some(connection) => report.record(connection.deliver(notification.clone())),
                None => {
                    tracing::error!(connection = %id, "room member without a registry entry");
                    report.dropped += 1;
                }
            }
        }
        tracing::debug!(
            delivered = report.delivered,
            dropped = report.dropped,
            "broadcast dispatched"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, Identity, Liveness, Timestamp};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn connect(
        tables: &mut SessionTables,
        name: &str,
    ) -> (ConnectionId, UnboundedReceiver<Notification>) {
        let id = ConnectionIdFactory::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        let identity = Identity::new(format!("id-{name}"), name.to_string(), None).unwrap();
        tables
            .register(id, identity, tx, Timestamp::new(0))
            .unwrap();
        (id, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(notification) = rx.try_recv() {
            received.push(notification);
        }
        received
    }

    fn tavern(tables: &mut SessionTables) -> RoomName {
        let gm = Identity::new("gm".to_string(), "gm".to_string(), None).unwrap();
        tables
            .rooms
            .create_or_get("Tavern", &gm, Timestamp::new(0))
            .unwrap();
        RoomName::new("Tavern".to_string()).unwrap()
    }

    #[test]
    fn test_to_room_reaches_only_members() {
        // テスト項目: to_room はルームのメンバーにだけ届く
        // given (前提条件):
        let mut tables = SessionTables::new();
        let room = tavern(&mut tables);
        let (a, mut rx_a) = connect(&mut tables, "alice");
        let (b, mut rx_b) = connect(&mut tables, "bob");
        let (_c, mut rx_c) = connect(&mut tables, "carol");
        tables.join(&a, "Tavern").unwrap();
        tables.join(&b, "Tavern").unwrap();

        // when (操作):
        let report = BroadcastDispatcher::to_room(
            &mut tables,
            &room,
            Notification::system(Some(room.clone()), "hello"),
        );

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert_eq!(drain(&mut rx_a).len(), 1);
        assert_eq!(drain(&mut rx_b).len(), 1);
        assert!(drain(&mut rx_c).is_empty());
    }

    #[test]
    fn test_to_room_except_skips_excluded() {
        // テスト項目: to_room_except は指定した接続を除いて配送する
        // given (前提条件):
        let mut tables = SessionTables::new();
        let room = tavern(&mut tables);
        let (a, mut rx_a) = connect(&mut tables, "alice");
        let (b, mut rx_b) = connect(&mut tables, "bob");
        tables.join(&a, "Tavern").unwrap();
        tables.join(&b, "Tavern").unwrap();

        // when (操作):
        let report = BroadcastDispatcher::to_room_except(
            &mut tables,
            &room,
            Some(&a),
            Notification::system(Some(room.clone()), "alice joined"),
        );

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(drain(&mut rx_b).len(), 1);
    }

    #[test]
    fn test_failed_recipient_does_not_block_others() {
        // テスト項目: 送信に失敗する接続があっても他の接続には配送される
        // given (前提条件):
        let mut tables = SessionTables::new();
        let (_a, rx_a) = connect(&mut tables, "alice");
        let (b, _rx_b) = connect(&mut tables, "bob");
        let (_c, mut rx_c) = connect(&mut tables, "carol");
        drop(rx_a); // alice の送信タスクが落ちた状態

        // when (操作):
        let first = BroadcastDispatcher::rooms_list_to_all(&mut tables);
        let second = BroadcastDispatcher::rooms_list_to_all(&mut tables);

        // then (期待する結果):
        assert_eq!(first, DeliveryReport { delivered: 2, dropped: 1 });
        assert_eq!(second, DeliveryReport { delivered: 2, dropped: 1 });
        assert_eq!(drain(&mut rx_c).len(), 2);
        assert_eq!(
            tables.connections.lookup(&b).unwrap().liveness,
            Liveness::Active
        );
    }

    #[test]
    fn test_per_connection_order_is_fifo() {
        // テスト項目: 同じ接続への通知は投入順に届く
        // given (前提条件):
        let mut tables = SessionTables::new();
        let room = tavern(&mut tables);
        let (a, mut rx_a) = connect(&mut tables, "alice");
        tables.join(&a, "Tavern").unwrap();

        // when (操作):
        for n in 0..10 {
            BroadcastDispatcher::to_room(
                &mut tables,
                &room,
                Notification::system(Some(room.clone()), format!("line {n}")),
            );
        }

        // then (期待する結果):
        let texts: Vec<String> = drain(&mut rx_a)
            .into_iter()
            .filter_map(|n| match n {
                Notification::SystemMessage { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        let expected: Vec<String> = (0..10).map(|n| format!("line {n}")).collect();
        assert_eq!(texts, expected);
    }
}
