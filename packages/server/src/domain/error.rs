//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Room name shorter or longer than allowed
    #[error("room name must be {min}-{max} characters long (got {actual})")]
    RoomNameLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    /// Room name with control characters or surrounding whitespace
    #[error("room name contains disallowed characters: {0:?}")]
    RoomNameCharacters(String),

    /// MessageContent validation error
    #[error("message cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("message cannot exceed {max} bytes (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// Die size outside the accepted range
    #[error("die size must be between 2 and {max} (got {actual})")]
    InvalidDieSize { max: u32, actual: i64 },

    /// Die size that is not a whole number, or too large to read at all
    #[error("die size must be a whole number between 2 and 4294967295 (got {0})")]
    UnparsableDieSize(String),

    /// Identity without a subject or username
    #[error("identity field `{0}` cannot be empty")]
    IdentityFieldEmpty(&'static str),
}

/// Errors raised by the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

/// Errors raised by the room directory
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("room {0:?} does not exist")]
    RoomNotFound(String),

    #[error("invalid room name: {0}")]
    InvalidRoomName(#[from] ValueObjectError),
}

/// Errors raised by combined membership transitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Errors returned by an identity provider
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
}
