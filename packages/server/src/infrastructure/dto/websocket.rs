//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`.

use serde::{Deserialize, Serialize};

use crate::domain::{Identity, Notification, RoomSummary};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Authenticate {
        token: String,
    },
    CreateRoom {
        room: String,
    },
    JoinRoom {
        room: String,
    },
    LeaveRoom {
        #[serde(default)]
        room: Option<String>,
    },
    SendMessage {
        #[serde(default)]
        room: Option<String>,
        message: String,
    },
    RollDice {
        #[serde(default)]
        room: Option<String>,
        /// Any JSON number; fractions are rejected when the die is built
        sides: serde_json::Number,
    },
    GetRooms {},
    GetOnlineUsers {
        #[serde(default)]
        room: Option<String>,
    },
    Heartbeat {},
}

impl ClientEvent {
    /// Event name as it appears in the `"type"` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authenticate { .. } => "authenticate",
            Self::CreateRoom { .. } => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom { .. } => "leave_room",
            Self::SendMessage { .. } => "send_message",
            Self::RollDice { .. } => "roll_dice",
            Self::GetRooms {} => "get_rooms",
            Self::GetOnlineUsers { .. } => "get_online_users",
            Self::Heartbeat {} => "heartbeat",
        }
    }
}

/// User information as shown to other clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub character_name: Option<String>,
}

impl From<Identity> for UserInfo {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            username: identity.username,
            character_name: identity.character_name,
        }
    }
}

/// Entry of `rooms_list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListing {
    pub name: String,
    pub member_count: usize,
}

impl From<RoomSummary> for RoomListing {
    fn from(summary: RoomSummary) -> Self {
        Self {
            name: summary.name.into_string(),
            member_count: summary.member_count,
        }
    }
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected {
        user: UserInfo,
        message: String,
    },
    RoomsList {
        rooms: Vec<RoomListing>,
    },
    RoomJoined {
        room: String,
        member_count: usize,
    },
    RoomLeft {
        room: String,
    },
    NewMessage {
        room: String,
        sequence: u64,
        username: String,
        character_name: Option<String>,
        /// Plain text, never markup
        message: String,
        timestamp: i64,
    },
    SystemMessage {
        room: Option<String>,
        message: String,
        timestamp: i64,
    },
    DiceResult {
        room: String,
        username: String,
        character_name: Option<String>,
        sides: u32,
        result: u32,
        timestamp: i64,
    },
    UsersOnline {
        room: Option<String>,
        users: Vec<UserInfo>,
        count: usize,
    },
    Error {
        code: String,
        message: String,
    },
}

impl From<Notification> for ServerEvent {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::Welcome { identity } => Self::Connected {
                message: format!("Welcome, {}!", identity.username),
                user: identity.into(),
            },
            Notification::RoomsList { rooms } => Self::RoomsList {
                rooms: rooms.into_iter().map(RoomListing::from).collect(),
            },
            Notification::RoomJoined { room, member_count } => Self::RoomJoined {
                room: room.into_string(),
                member_count,
            },
            Notification::RoomLeft { room } => Self::RoomLeft {
                room: room.into_string(),
            },
            Notification::NewMessage(message) => Self::NewMessage {
                room: message.room.into_string(),
                sequence: message.sequence,
                username: message.author.username,
                character_name: message.author.character_name,
                message: message.content.into_string(),
                timestamp: message.timestamp.value(),
            },
            Notification::SystemMessage {
                room,
                text,
                timestamp,
            } => Self::SystemMessage {
                room: room.map(|r| r.into_string()),
                message: text,
                timestamp: timestamp.value(),
            },
            Notification::DiceResult(roll) => Self::DiceResult {
                room: roll.room.into_string(),
                username: roll.roller.username,
                character_name: roll.roller.character_name,
                sides: roll.die_size.value(),
                result: roll.outcome,
                timestamp: roll.timestamp.value(),
            },
            Notification::UsersOnline { room, users } => Self::UsersOnline {
                room: room.map(|r| r.into_string()),
                count: users.len(),
                users: users.into_iter().map(UserInfo::from).collect(),
            },
            Notification::Rejected { code, reason } => Self::Error {
                code: code.to_string(),
                message: reason,
            },
        }
    }
}
