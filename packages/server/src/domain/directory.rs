//! Room Directory.
//!
//! Owns every room ever created in this process. Rooms are never removed
//! implicitly; empty rooms simply drop out of the active listing.

use std::collections::HashMap;

use super::{
    entity::{Identity, Room, RoomSummary},
    error::DirectoryError,
    value_object::{ConnectionId, RoomName, Timestamp},
};

#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomName, Room>,
    /// Room names in creation order
    order: Vec<RoomName>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room, or return the existing one with that name.
    ///
    /// The boolean is true when the room was created by this call.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidRoomName` when the name breaks the
    /// room name policy.
    pub fn create_or_get(
        &mut self,
        name: &str,
        creator: &Identity,
        created_at: Timestamp,
    ) -> Result<(&Room, bool), DirectoryError> {
        let name = RoomName::new(name.to_string())?;
        let created = !self.rooms.contains_key(&name);
        if created {
            self.order.push(name.clone());
        }
        let room = self
            .rooms
            .entry(name.clone())
            .or_insert_with(|| Room::new(name, creator.clone(), created_at));
        Ok((room, created))
    }

    pub fn get(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rooms.contains_key(name)
    }

    /// # Errors
    ///
    /// Returns `DirectoryError::RoomNotFound` if the room does not exist.
    pub fn add_member(
        &mut self,
        name: &RoomName,
        connection_id: ConnectionId,
    ) -> Result<(), DirectoryError> {
        self.room_mut(name)?.add_member(connection_id);
        Ok(())
    }

    /// Removing a connection that is not a member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::RoomNotFound` if the room does not exist.
    pub fn remove_member(
        &mut self,
        name: &RoomName,
        connection_id: &ConnectionId,
    ) -> Result<(), DirectoryError> {
        self.room_mut(name)?.remove_member(connection_id);
        Ok(())
    }

    /// Issue the next per-room message sequence number.
    pub fn next_sequence(&mut self, name: &RoomName) -> Result<u64, DirectoryError> {
        Ok(self.room_mut(name)?.next_sequence())
    }

    /// Rooms with at least one member, ordered by creation.
    pub fn list_active(&self) -> Vec<RoomSummary> {
        self.order
            .iter()
            .filter_map(|name| self.rooms.get(name))
            .filter(|room| room.member_count() > 0)
            .map(Room::summary)
            .collect()
    }

    /// Every room, ordered by creation.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.order.iter().filter_map(|name| self.rooms.get(name))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn room_mut(&mut self, name: &RoomName) -> Result<&mut Room, DirectoryError> {
        self.rooms
            .get_mut(name)
            .ok_or_else(|| DirectoryError::RoomNotFound(name.to_string()))
    }
}
