//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Minimum room name length in characters
pub const ROOM_NAME_MIN_CHARS: usize = 3;

/// Maximum room name length in characters
pub const ROOM_NAME_MAX_CHARS: usize = 64;

/// Maximum message size in bytes
pub const MESSAGE_MAX_BYTES: usize = 10000;

/// Identifier of one live transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name value object.
///
/// Names are case-sensitive, 3 to 64 characters long (counted as Unicode
/// scalar values), contain no control characters and carry no leading or
/// trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::RoomNameLength` or
    /// `ValueObjectError::RoomNameCharacters` when the name breaks the policy.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let chars = name.chars().count();
        if !(ROOM_NAME_MIN_CHARS..=ROOM_NAME_MAX_CHARS).contains(&chars) {
            return Err(ValueObjectError::RoomNameLength {
                min: ROOM_NAME_MIN_CHARS,
                max: ROOM_NAME_MAX_CHARS,
                actual: chars,
            });
        }
        if name.chars().any(char::is_control) || name.trim() != name {
            return Err(ValueObjectError::RoomNameCharacters(name));
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

// Lets maps keyed by RoomName be queried with &str.
impl Borrow<str> for RoomName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Stored and delivered as plain text. Surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Errors
    ///
    /// Empty (after trimming) or oversized content is rejected.
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = trimmed.len();
        if len > MESSAGE_MAX_BYTES {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_MAX_BYTES,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of faces of a die. Always at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieSize(u32);

impl DieSize {
    /// Create a new DieSize from a caller-supplied integer.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::InvalidDieSize` below 2 or above `u32::MAX`.
    pub fn new(sides: i64) -> Result<Self, ValueObjectError> {
        match u32::try_from(sides) {
            Ok(sides) if sides >= 2 => Ok(Self(sides)),
            _ => Err(ValueObjectError::InvalidDieSize {
                max: u32::MAX,
                actual: sides,
            }),
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DieSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Timestamp for the current instant.
    pub fn now() -> Self {
        Self(tavern_shared::time::now_millis())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_name_new_success() {
        // テスト項目: 有効なルーム名を作成できる
        // given (前提条件):
        let name = "Tavern".to_string();

        // when (操作):
        let result = RoomName::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "Tavern");
    }

    #[test]
    fn test_room_name_boundary_lengths_accepted() {
        // テスト項目: 3 文字と 64 文字のルーム名は境界値として受け入れられる
        // given (前提条件):
        let shortest = "abc".to_string();
        let longest = "a".repeat(64);

        // then (期待する結果):
        assert!(RoomName::new(shortest).is_ok());
        assert!(RoomName::new(longest).is_ok());
    }

    #[test]
    fn test_room_name_too_short_fails() {
        // テスト項目: 2 文字以下のルーム名は作成できない
        // when (操作):
        let result = RoomName::new("ab".to_string());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomNameLength {
                min: 3,
                max: 64,
                actual: 2
            }
        );
    }

    #[test]
    fn test_room_name_too_long_fails() {
        // テスト項目: 65 文字以上のルーム名は作成できない
        // when (操作):
        let result = RoomName::new("a".repeat(65));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomNameLength {
                min: 3,
                max: 64,
                actual: 65
            }
        );
    }

    #[test]
    fn test_room_name_counts_characters_not_bytes() {
        // テスト項目: ルーム名の長さはバイト数ではなく文字数で数える
        // given (前提条件): 3 文字だが 9 バイト
        let name = "酒場だ".to_string();

        // then (期待する結果):
        assert!(RoomName::new(name).is_ok());
    }

    #[test]
    fn test_room_name_rejects_control_and_padding() {
        // テスト項目: 制御文字や前後の空白を含むルーム名は作成できない
        // then (期待する結果):
        assert!(matches!(
            RoomName::new("Tav\nern".to_string()),
            Err(ValueObjectError::RoomNameCharacters(_))
        ));
        assert!(matches!(
            RoomName::new(" Tavern".to_string()),
            Err(ValueObjectError::RoomNameCharacters(_))
        ));
    }

    #[test]
    fn test_room_name_is_case_sensitive() {
        // テスト項目: ルーム名は大文字小文字を区別する
        // given (前提条件):
        let upper = RoomName::new("Tavern".to_string()).unwrap();
        let lower = RoomName::new("tavern".to_string()).unwrap();

        // then (期待する結果):
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_message_content_trims_whitespace() {
        // テスト項目: メッセージ内容の前後の空白は除去される
        // when (操作):
        let content = MessageContent::new("  Hello, world!\n".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(content.as_str(), "Hello, world!");
    }

    #[test]
    fn test_message_content_whitespace_only_fails() {
        // テスト項目: 空白のみのメッセージ内容は作成できない
        // when (操作):
        let result = MessageContent::new("   ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageContentEmpty);
    }

    #[test]
    fn test_message_content_too_long_fails() {
        // テスト項目: 10001 バイト以上のメッセージ内容は作成できない
        // when (操作):
        let result = MessageContent::new("a".repeat(10001));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageContentTooLong {
                max: 10000,
                actual: 10001
            }
        );
    }

    #[test]
    fn test_die_size_bounds() {
        // テスト項目: ダイスの面数は 2 以上でなければならない
        // then (期待する結果):
        assert!(DieSize::new(2).is_ok());
        assert_eq!(DieSize::new(20).unwrap().value(), 20);
        assert!(DieSize::new(1).is_err());
        assert!(DieSize::new(0).is_err());
        assert!(DieSize::new(-6).is_err());
        assert!(DieSize::new(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts2.value(), 2000);
    }
}
