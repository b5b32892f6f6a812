//! Domain layer for the coordinator.
//!
//! Business rules for connections, rooms, membership and dice, independent
//! of data transfer objects and infrastructure concerns.

pub mod dice;
pub mod directory;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod identity;
pub mod registry;
pub mod repository;
pub mod session;
pub mod value_object;

pub use directory::RoomDirectory;
pub use entity::{
    ChatMessage, Connection, Delivery, DiceRoll, Identity, Liveness, Outbound, Room, RoomSummary,
};
pub use error::{
    DirectoryError, IdentityError, MembershipError, RegistryError, ValueObjectError,
};
pub use event::Notification;
pub use factory::ConnectionIdFactory;
pub use identity::IdentityProvider;
pub use registry::ConnectionRegistry;
pub use repository::{SessionGuard, SessionRepository};
pub use session::{Disconnected, JoinOutcome, SessionTables};
pub use value_object::{ConnectionId, DieSize, MessageContent, RoomName, Timestamp};
