//! Server startup and shutdown.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::SessionRepository,
    error::ServerError,
    infrastructure::{identity::JwtIdentityProvider, repository::InMemorySessionRepository},
    ui::{
        handler::{get_room_detail, get_rooms, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Bind, serve until Ctrl+C / SIGTERM, then close the remaining connections.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    let state = Arc::new(AppState::new(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(JwtIdentityProvider::new(config.jwt_secret.as_bytes())),
        config.timeouts(),
    ));
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `signal` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    signal: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    tracing::info!("listening on {}", local_addr);

    let app = build_router(state.clone());
    let shutdown = async move {
        signal.await;
        // 送信キューを閉じて、各 WebSocket に close フレームを送らせる
        let closed = state.repository.teardown().await;
        tracing::info!(closed, "closed remaining connections");
    };
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{name}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
