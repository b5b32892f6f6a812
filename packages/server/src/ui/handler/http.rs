//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tavern_shared::time::millis_to_rfc3339;

use crate::{
    domain::SessionRepository,
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state
        .repository
        .active_rooms()
        .await
        .into_iter()
        .map(|room| RoomSummaryDto {
            name: room.name.into_string(),
            member_count: room.member_count,
        })
        .collect();
    Json(rooms)
}

/// Get room detail by name
///
/// Empty rooms are still addressable here even though the listing hides them.
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let tables = state.repository.lock().await;
    let room = tables.rooms.get(&name).ok_or(StatusCode::NOT_FOUND)?;

    let mut members: Vec<String> = room
        .members()
        .filter_map(|id| tables.connections.lookup(id))
        .map(|connection| connection.identity.username.clone())
        .collect();
    members.sort();

    Ok(Json(RoomDetailDto {
        name: room.name.to_string(),
        creator: room.creator.username.clone(),
        created_at: millis_to_rfc3339(room.created_at.value()),
        member_count: room.member_count(),
        members,
    }))
}
