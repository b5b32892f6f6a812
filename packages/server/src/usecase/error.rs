//! UseCase 層のエラー定義
//!
//! 検証エラーは要求元の接続にだけ `error` イベントとして返されます。
//! `code()` はそのイベントの `code` フィールドに使う安定した識別子です。

use thiserror::Error;

use crate::domain::{
    ConnectionId, DirectoryError, MembershipError, RegistryError, ValueObjectError,
};

/// 要求元に返せるエラー
pub trait Rejection: std::error::Error {
    fn code(&self) -> &'static str;
}

/// 接続登録のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

impl From<RegistryError> for ConnectError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::DuplicateConnection(id) => Self::DuplicateConnection(id),
            RegistryError::UnknownConnection(id) => Self::UnknownConnection(id),
        }
    }
}

/// ルーム作成・参加・退出のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    #[error("room {0:?} does not exist")]
    RoomNotFound(String),

    #[error("invalid room name: {0}")]
    InvalidRoomName(ValueObjectError),
}

impl From<MembershipError> for RoomError {
    fn from(error: MembershipError) -> Self {
        match error {
            MembershipError::Registry(error) => error.into(),
            MembershipError::Directory(error) => error.into(),
        }
    }
}

impl From<RegistryError> for RoomError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::DuplicateConnection(id) | RegistryError::UnknownConnection(id) => {
                Self::UnknownConnection(id)
            }
        }
    }
}

impl From<DirectoryError> for RoomError {
    fn from(error: DirectoryError) -> Self {
        match error {
            DirectoryError::RoomNotFound(name) => Self::RoomNotFound(name),
            DirectoryError::InvalidRoomName(error) => Self::InvalidRoomName(error),
        }
    }
}

impl Rejection for RoomError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownConnection(_) => "unknown_connection",
            Self::RoomNotFound(_) => "room_not_found",
            Self::InvalidRoomName(_) => "invalid_room_name",
        }
    }
}

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    #[error("join a room before sending messages")]
    NotInRoom,

    #[error("invalid message: {0}")]
    InvalidMessage(ValueObjectError),
}

impl Rejection for SendMessageError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownConnection(_) => "unknown_connection",
            Self::NotInRoom => "not_in_room",
            Self::InvalidMessage(_) => "invalid_message",
        }
    }
}

/// ダイスロールのエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RollDiceError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    #[error("join a room before rolling dice")]
    NotInRoom,

    #[error("{0}")]
    InvalidDieSize(ValueObjectError),
}

impl Rejection for RollDiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownConnection(_) => "unknown_connection",
            Self::NotInRoom => "not_in_room",
            Self::InvalidDieSize(_) => "invalid_die_size",
        }
    }
}
