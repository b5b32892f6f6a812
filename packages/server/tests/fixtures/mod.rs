//! Shared fixtures for integration tests.
//!
//! Each test starts its own server on an ephemeral port, so tests can run in
//! parallel without fighting over ports.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tavern_server::{
    domain::SessionRepository,
    infrastructure::{
        identity::{JwtIdentityProvider, TokenClaims},
        repository::InMemorySessionRepository,
    },
    serve_with_shutdown,
    ui::state::{AppState, GatewayTimeouts},
};
use tokio::{net::TcpStream, sync::oneshot};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        Message,
        client::IntoClientRequest,
        http::{HeaderValue, header::AUTHORIZATION},
    },
};

pub const SECRET: &[u8] = b"integration-test-secret";

/// How long a test waits for any single server event
const RECV_TIMEOUT: Duration = Duration::from_secs(3);

pub struct TestServer {
    addr: SocketAddr,
    pub repository: Arc<dyn SessionRepository>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with a short authentication window.
    pub async fn start() -> Self {
        Self::start_with(GatewayTimeouts {
            auth: Duration::from_millis(500),
            idle: Duration::from_secs(10),
        })
        .await
    }

    pub async fn start_with(timeouts: GatewayTimeouts) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let repository: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let state = Arc::new(AppState::new(
            repository.clone(),
            Arc::new(JwtIdentityProvider::new(SECRET)),
            timeouts,
        ));
        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(serve_with_shutdown(listener, state, async move {
            let _ = signal.await;
        }));

        Self {
            addr,
            repository,
            shutdown: Some(shutdown),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Open a socket and authenticate with an `authenticate` first frame.
    ///
    /// Returns once the `connected` welcome has arrived.
    pub async fn connect(&self, username: &str) -> WsClient {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        let mut client = WsClient { stream };
        client
            .send(json!({"type": "authenticate", "token": token(username)}))
            .await;
        let welcome = client.recv_type("connected").await;
        assert_eq!(welcome["user"]["username"], username);
        client
    }

    /// Open a socket carrying the token in the `Authorization` header.
    pub async fn connect_with_header(&self, token: &str) -> WsClient {
        let mut request = self
            .ws_url()
            .into_client_request()
            .expect("Failed to build request");
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("Invalid header"),
        );
        let (stream, _) = connect_async(request).await.expect("Failed to connect");
        WsClient { stream }
    }

    /// Open a socket without authenticating.
    pub async fn connect_raw(&self) -> WsClient {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        WsClient { stream }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// A valid token for `username`, signed with [`SECRET`].
pub fn token(username: &str) -> String {
    let now = tavern_shared::time::now_millis() / 1000;
    JwtIdentityProvider::new(SECRET)
        .issue(&TokenClaims {
            sub: format!("user-{username}"),
            username: username.to_string(),
            character_name: None,
            exp: (now + 3600) as u64,
        })
        .expect("Failed to issue token")
}

pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn send(&mut self, event: Value) {
        self.stream
            .send(Message::text(event.to_string()))
            .await
            .expect("Failed to send event");
    }

    /// Next JSON event, or `None` once the server has closed the socket.
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a server event");
            match frame {
                Some(Ok(Message::Text(text))) => {
                    return Some(serde_json::from_str(&text).expect("Server sent invalid JSON"));
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return None,
                Some(Ok(other)) => panic!("Unexpected frame: {other:?}"),
            }
        }
    }

    /// Skip events until one matches `predicate`.
    pub async fn recv_matching(&mut self, predicate: impl Fn(&Value) -> bool) -> Value {
        loop {
            match self.recv().await {
                Some(event) if predicate(&event) => return event,
                Some(_) => continue,
                None => panic!("Socket closed before the expected event arrived"),
            }
        }
    }

    /// Skip events until one of type `kind` arrives.
    pub async fn recv_type(&mut self, kind: &str) -> Value {
        self.recv_matching(|event| event["type"] == kind).await
    }

    /// Wait until the server closes the socket, skipping pending events.
    pub async fn expect_closed(&mut self) {
        while self.recv().await.is_some() {}
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// `(name, member_count)` pairs of a `rooms_list` event.
pub fn listing(event: &Value) -> Vec<(String, u64)> {
    event["rooms"]
        .as_array()
        .expect("rooms should be an array")
        .iter()
        .map(|room| {
            (
                room["name"].as_str().unwrap_or_default().to_string(),
                room["member_count"].as_u64().unwrap_or_default(),
            )
        })
        .collect()
}
