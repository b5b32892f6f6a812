//! WebSocket connection handlers (Session Gateway).

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc::{self, WeakUnboundedSender};

use crate::{
    domain::{ConnectionId, Notification, ValueObjectError},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::{
        handler::auth::{GatewayError, authenticate, bearer_token},
        state::AppState,
    },
    usecase::{Rejection, RollDiceError},
};

/// How long the writer may keep flushing after the connection is cleaned up
const WRITER_DRAIN: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let header_token = bearer_token(&headers);
    ws.on_upgrade(move |socket| handle_socket(socket, state, header_token))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, header_token: Option<String>) {
    let (mut sender, mut receiver) = socket.split();

    // 1. 認証（成功するまで接続は登録しない）
    let identity = match authenticate(
        &mut receiver,
        header_token,
        state.identity.as_ref(),
        state.timeouts.auth,
    )
    .await
    {
        Ok(identity) => identity,
        Err(error) => {
            tracing::warn!(code = error.code(), "rejecting socket: {}", error);
            refuse(&mut sender, &error).await;
            return;
        }
    };

    // 2. 登録（歓迎メッセージとルーム一覧は送信キューに積まれる）
    let (tx, mut rx) = mpsc::unbounded_channel();
    let own_queue = tx.downgrade();
    let connection_id = match state.connect.execute(identity, tx).await {
        Ok(id) => id,
        Err(error) => {
            tracing::error!("failed to register connection: {}", error);
            return;
        }
    };

    // Spawn a task to drain this connection's outbound queue to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            let event = ServerEvent::from(notification);
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(connection = %connection_id, "failed to encode event: {}", e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::debug!(connection = %connection_id, "socket write failed: {}", e);
                return;
            }
        }
        // 送信キューが閉じた = 接続が登録から外れた
        let close = CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        };
        if let Err(e) = sender.send(Message::Close(Some(close))).await {
            tracing::debug!(connection = %connection_id, "close frame not sent: {}", e);
        }
    });

    // Spawn a task to read client events; it ends on close, error or idle timeout
    let reader_state = state.clone();
    let idle = state.timeouts.idle;
    let mut recv_task = tokio::spawn(async move {
        loop {
            let frame = match tokio::time::timeout(idle, receiver.next()).await {
                Err(_) => {
                    tracing::info!(connection = %connection_id, "idle timeout after {:?}", idle);
                    break;
                }
                Ok(None) => break,
                Ok(Some(Err(e))) => {
                    tracing::warn!(connection = %connection_id, "websocket error: {}", e);
                    break;
                }
                Ok(Some(Ok(frame))) => frame,
            };

            match frame {
                Message::Text(text) => {
                    dispatch(&reader_state, connection_id, &own_queue, &text).await;
                }
                Message::Binary(_) => reply(
                    &own_queue,
                    Notification::Rejected {
                        code: "invalid_event",
                        reason: "binary frames are not supported".to_string(),
                    },
                ),
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {
                    tracing::trace!(connection = %connection_id, "keep-alive");
                }
                Message::Close(_) => {
                    tracing::info!(connection = %connection_id, "client requested close");
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, stop reading
    let writer_finished = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => {
            recv_task.abort();
            true
        }
    };

    // 3. 後片付け（送信キューもここで閉じる）
    state.membership.disconnect_cleanup(connection_id).await;
    if !writer_finished && tokio::time::timeout(WRITER_DRAIN, &mut send_task).await.is_err() {
        send_task.abort();
    }
}

/// Route one client event to its use case.
async fn dispatch(
    state: &AppState,
    connection_id: ConnectionId,
    own_queue: &WeakUnboundedSender<Notification>,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(connection = %connection_id, "malformed event: {}", e);
            reply(
                own_queue,
                Notification::Rejected {
                    code: "invalid_event",
                    reason: format!("malformed event: {e}"),
                },
            );
            return;
        }
    };
    let kind = event.kind();
    tracing::debug!(connection = %connection_id, kind, "event received");

    let rejection = match event {
        ClientEvent::Authenticate { .. } => Some(Notification::Rejected {
            code: "already_authenticated",
            reason: "connection is already authenticated".to_string(),
        }),
        ClientEvent::CreateRoom { room } => state
            .membership
            .create(connection_id, &room)
            .await
            .err()
            .map(rejected),
        ClientEvent::JoinRoom { room } => state
            .membership
            .join(connection_id, &room)
            .await
            .err()
            .map(rejected),
        ClientEvent::LeaveRoom { room } => state
            .membership
            .leave(connection_id, room.as_deref())
            .await
            .err()
            .map(rejected),
        ClientEvent::SendMessage { room, message } => state
            .messages
            .execute(connection_id, room.as_deref(), message)
            .await
            .err()
            .map(rejected),
        ClientEvent::RollDice { room, sides } => match sides.as_i64() {
            Some(sides) => state
                .dice
                .execute(connection_id, room.as_deref(), sides)
                .await
                .err()
                .map(rejected),
            None => Some(rejected(RollDiceError::InvalidDieSize(
                ValueObjectError::UnparsableDieSize(sides.to_string()),
            ))),
        },
        ClientEvent::GetRooms {} => state.queries.list_rooms(connection_id).await.err().map(rejected),
        ClientEvent::GetOnlineUsers { room } => state
            .queries
            .online_users(connection_id, room.as_deref())
            .await
            .err()
            .map(rejected),
        ClientEvent::Heartbeat {} => None,
    };

    if let Some(notification) = rejection {
        tracing::warn!(connection = %connection_id, kind, "request rejected: {:?}", notification);
        reply(own_queue, notification);
    }
}

fn rejected<E: Rejection>(error: E) -> Notification {
    Notification::Rejected {
        code: error.code(),
        reason: error.to_string(),
    }
}

/// Enqueue a notification for this connection only.
fn reply(own_queue: &WeakUnboundedSender<Notification>, notification: Notification) {
    // the queue is gone once the connection has been cleaned up
    if let Some(tx) = own_queue.upgrade() {
        let _ = tx.send(notification);
    }
}

/// Tell an unauthenticated socket why it is refused and close it.
async fn refuse(sender: &mut SplitSink<WebSocket, Message>, error: &GatewayError) {
    let event = ServerEvent::Error {
        code: error.code().to_string(),
        message: error.to_string(),
    };
    match serde_json::to_string(&event) {
        Ok(json) => {
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::debug!("error event not sent: {}", e);
            }
        }
        Err(e) => tracing::error!("failed to encode error event: {}", e),
    }
    let close = CloseFrame {
        code: close_code::POLICY,
        reason: error.code().into(),
    };
    if let Err(e) = sender.send(Message::Close(Some(close))).await {
        tracing::debug!("close frame not sent: {}", e);
    }
}
