//! Notifications placed on a connection's outbound queue.
//!
//! These are domain events; the gateway maps them to wire DTOs.

use super::{
    entity::{ChatMessage, DiceRoll, Identity, RoomSummary},
    value_object::{RoomName, Timestamp},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Sent once after successful authentication
    Welcome { identity: Identity },
    RoomsList { rooms: Vec<RoomSummary> },
    RoomJoined { room: RoomName, member_count: usize },
    RoomLeft { room: RoomName },
    NewMessage(ChatMessage),
    SystemMessage {
        room: Option<RoomName>,
        text: String,
        timestamp: Timestamp,
    },
    DiceResult(DiceRoll),
    UsersOnline {
        room: Option<RoomName>,
        users: Vec<Identity>,
    },
    /// Request rejected; only ever sent to the originating connection
    Rejected { code: &'static str, reason: String },
}

impl Notification {
    pub fn system(room: Option<RoomName>, text: impl Into<String>) -> Self {
        Self::SystemMessage {
            room,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }
}
