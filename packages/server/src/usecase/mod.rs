//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。
//! どのユースケースも一つのセッションロックの中で状態遷移と通知の投入を行います。

pub mod broadcast;
pub mod connect;
pub mod error;
pub mod membership;
pub mod query;
pub mod roll_dice;
pub mod send_message;

pub use broadcast::{BroadcastDispatcher, DeliveryReport};
pub use connect::ConnectUseCase;
pub use error::{ConnectError, Rejection, RollDiceError, RoomError, SendMessageError};
pub use membership::MembershipManager;
pub use query::QueryUseCase;
pub use roll_dice::RollDiceUseCase;
pub use send_message::SendMessageUseCase;
