//! Core domain models for the coordinator.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use super::{
    error::ValueObjectError,
    event::Notification,
    value_object::{ConnectionId, DieSize, MessageContent, RoomName, Timestamp},
};

/// Outbound FIFO queue of one connection.
pub type Outbound = UnboundedSender<Notification>;

/// Authenticated user behind a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable subject issued by the identity provider
    pub user_id: String,
    /// Display name
    pub username: String,
    /// Optional in-game character name
    pub character_name: Option<String>,
}

impl Identity {
    /// Create a new identity.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::IdentityFieldEmpty` for a blank subject or username.
    pub fn new(
        user_id: String,
        username: String,
        character_name: Option<String>,
    ) -> Result<Self, ValueObjectError> {
        if user_id.trim().is_empty() {
            return Err(ValueObjectError::IdentityFieldEmpty("user_id"));
        }
        if username.trim().is_empty() {
            return Err(ValueObjectError::IdentityFieldEmpty("username"));
        }
        Ok(Self {
            user_id,
            username,
            character_name: character_name.filter(|name| !name.trim().is_empty()),
        })
    }
}

/// Liveness of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    Active,
    /// Transport failed or cleanup started; deliveries are dropped
    Draining,
    Closed,
}

/// Result of handing one notification to a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Enqueued,
    Dropped,
}

/// One live transport session bound to an authenticated identity
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Identity,
    /// Room currently occupied, at most one
    pub current_room: Option<RoomName>,
    pub liveness: Liveness,
    pub connected_at: Timestamp,
    outbound: Outbound,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        identity: Identity,
        outbound: Outbound,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            id,
            identity,
            current_room: None,
            liveness: Liveness::Active,
            connected_at,
            outbound,
        }
    }

    pub fn is_active(&self) -> bool {
        self.liveness == Liveness::Active
    }

    /// Enqueue a notification without waiting on the transport.
    ///
    /// A closed queue means the writer task is gone: the connection is
    /// switched to `Draining` and later deliveries are dropped silently.
    pub fn deliver(&mut self, notification: Notification) -> Delivery {
        if !self.is_active() {
            return Delivery::Dropped;
        }
        if self.outbound.send(notification).is_err() {
            tracing::warn!(
                connection = %self.id,
                user = %self.identity.username,
                "TransportSendFailure: outbound queue closed, skipping recipient"
            );
            self.liveness = Liveness::Draining;
            return Delivery::Dropped;
        }
        Delivery::Enqueued
    }
}

/// Represents a named chat/game room
#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    pub creator: Identity,
    pub created_at: Timestamp,
    members: HashSet<ConnectionId>,
    last_sequence: u64,
}

impl Room {
    /// Create a new empty room
    pub fn new(name: RoomName, creator: Identity, created_at: Timestamp) -> Self {
        Self {
            name,
            creator,
            created_at,
            members: HashSet::new(),
            last_sequence: 0,
        }
    }

    /// Add a member. Returns false if it was already present.
    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// Remove a member. Removing a non-member is a no-op.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> impl Iterator<Item = &ConnectionId> {
        self.members.iter()
    }

    /// Issue the next message sequence number (starts at 1).
    pub fn next_sequence(&mut self) -> u64 {
        self.last_sequence += 1;
        self.last_sequence
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            name: self.name.clone(),
            member_count: self.member_count(),
        }
    }
}

/// Entry of the active room listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub name: RoomName,
    pub member_count: usize,
}

/// Represents a chat line in the domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub room: RoomName,
    pub author: Identity,
    pub content: MessageContent,
    pub timestamp: Timestamp,
    /// Per-room, monotonically increasing
    pub sequence: u64,
}

/// Outcome of one die roll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub room: RoomName,
    pub roller: Identity,
    pub die_size: DieSize,
    pub outcome: u32,
    pub timestamp: Timestamp,
}
