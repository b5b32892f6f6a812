//! Session tables: the connection registry and the room directory together.
//!
//! `Connection::current_room` and `Room::members` are two views of one
//! relation. Every method here that touches one also updates the other, and
//! callers hold the session lock for the whole call, so no observer can see
//! a connection in two rooms or in a gap between rooms.

use super::{
    directory::RoomDirectory,
    entity::{Connection, Identity, Outbound},
    error::{DirectoryError, MembershipError, RegistryError},
    registry::ConnectionRegistry,
    value_object::{ConnectionId, RoomName, Timestamp},
};

/// Effect of a join request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Already a member of the requested room
    Unchanged,
    Joined {
        left: Option<RoomName>,
        joined: RoomName,
    },
}

/// What a disconnect removed
#[derive(Debug)]
pub struct Disconnected {
    pub connection: Connection,
    pub left: Option<RoomName>,
}

#[derive(Debug, Default)]
pub struct SessionTables {
    pub connections: ConnectionRegistry,
    pub rooms: RoomDirectory,
}

impl SessionTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection with no room.
    pub fn register(
        &mut self,
        id: ConnectionId,
        identity: Identity,
        outbound: Outbound,
        connected_at: Timestamp,
    ) -> Result<&Connection, RegistryError> {
        self.connections
            .register(id, identity, outbound, connected_at)
    }

    /// Move a connection into `room`, leaving its previous room in the same step.
    ///
    /// # Errors
    ///
    /// `UnknownConnection`, `InvalidRoomName` or `RoomNotFound`; nothing is
    /// mutated when an error is returned.
    pub fn join(
        &mut self,
        id: &ConnectionId,
        room: &str,
    ) -> Result<JoinOutcome, MembershipError> {
        let current = self
            .connections
            .lookup(id)
            .ok_or(RegistryError::UnknownConnection(*id))?
            .current_room
            .clone();
        let target = RoomName::new(room.to_string()).map_err(DirectoryError::from)?;
        if !self.rooms.contains(target.as_str()) {
            return Err(DirectoryError::RoomNotFound(target.into_string()).into());
        }
        if current.as_ref() == Some(&target) {
            return Ok(JoinOutcome::Unchanged);
        }

        if let Some(old) = &current {
            self.rooms.remove_member(old, id)?;
        }
        self.rooms.add_member(&target, *id)?;
        self.connections.set_room(id, Some(target.clone()))?;
        debug_assert!(self.is_consistent());

        Ok(JoinOutcome::Joined {
            left: current,
            joined: target,
        })
    }

    /// Leave the current room. Returns the room left, if any.
    ///
    /// # Errors
    ///
    /// `UnknownConnection` when the connection is not registered.
    pub fn leave(&mut self, id: &ConnectionId) -> Result<Option<RoomName>, MembershipError> {
        let current = self
            .connections
            .lookup(id)
            .ok_or(RegistryError::UnknownConnection(*id))?
            .current_room
            .clone();
        let Some(old) = current else {
            return Ok(None);
        };
        self.rooms.remove_member(&old, id)?;
        self.connections.set_room(id, None)?;
        debug_assert!(self.is_consistent());
        Ok(Some(old))
    }

    /// Leave and unregister. An unknown connection is treated as already clean.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<Disconnected> {
        // leave only fails for unknown connections
        let left = self.leave(id).ok()?;
        let connection = self.connections.remove(id).ok()?;
        debug_assert!(self.is_consistent());
        Some(Disconnected { connection, left })
    }

    /// Membership symmetry: every room pointer is matched by a member entry
    /// and every member entry by a room pointer.
    pub fn is_consistent(&self) -> bool {
        let pointers_match = self.connections.iter().all(|connection| {
            match &connection.current_room {
                Some(room) => self
                    .rooms
                    .get(room.as_str())
                    .is_some_and(|r| r.is_member(&connection.id)),
                None => true,
            }
        });
        let members_match = self.rooms.iter().all(|room| {
            room.members().all(|member| {
                self.connections
                    .lookup(member)
                    .is_some_and(|c| c.current_room.as_ref() == Some(&room.name))
            })
        });
        pointers_match && members_match
    }
}
