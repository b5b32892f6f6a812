//! Connection Registry.
//!
//! Tracks every live connection, its identity and the room it occupies.
//! The registry itself is not synchronised; it lives inside
//! [`SessionTables`](super::session::SessionTables) behind one lock.

use std::collections::HashMap;

use super::{
    entity::{Connection, Identity, Liveness, Outbound},
    error::RegistryError,
    value_object::{ConnectionId, RoomName, Timestamp},
};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly authenticated connection.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateConnection` if the id is taken.
    pub fn register(
        &mut self,
        id: ConnectionId,
        identity: Identity,
        outbound: Outbound,
        connected_at: Timestamp,
    ) -> Result<&Connection, RegistryError> {
        if self.connections.contains_key(&id) {
            return Err(RegistryError::DuplicateConnection(id));
        }
        let connection = Connection::new(id, identity, outbound, connected_at);
        Ok(self.connections.entry(id).or_insert(connection))
    }

    pub fn lookup(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn lookup_mut(&mut self, id: &ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id)
    }

    /// Point a connection at a room, or at no room.
    ///
    /// Only [`SessionTables`](super::session::SessionTables) should call this,
    /// together with the matching directory update.
    pub fn set_room(
        &mut self,
        id: &ConnectionId,
        room: Option<RoomName>,
    ) -> Result<(), RegistryError> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or(RegistryError::UnknownConnection(*id))?;
        connection.current_room = room;
        Ok(())
    }

    /// Remove a connection. The returned value is marked `Closed`.
    pub fn remove(&mut self, id: &ConnectionId) -> Result<Connection, RegistryError> {
        let mut connection = self
            .connections
            .remove(id)
            .ok_or(RegistryError::UnknownConnection(*id))?;
        connection.liveness = Liveness::Closed;
        Ok(connection)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
