//! UseCase: ダイスロール
//!
//! 出目の生成は Domain 層の Dice Engine に任せ、ここではルームへの配送だけを行います。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DieSize, DiceRoll, Notification, SessionRepository, Timestamp, dice,
};

use super::{broadcast::BroadcastDispatcher, error::RollDiceError};

/// ダイスロールのユースケース
pub struct RollDiceUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl RollDiceUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// ダイスを振り、結果を現在のルームに配送
    ///
    /// # Returns
    ///
    /// * `Ok(DiceRoll)` - 配送した結果
    /// * `Err(RollDiceError)` - 面数が 2 未満、またはルーム未参加
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room: Option<&str>,
        sides: i64,
    ) -> Result<DiceRoll, RollDiceError> {
        let die_size = DieSize::new(sides).map_err(RollDiceError::InvalidDieSize)?;

        let mut tables = self.repository.lock().await;
        let connection = tables
            .connections
            .lookup(&connection_id)
            .ok_or(RollDiceError::UnknownConnection(connection_id))?;
        let current = connection
            .current_room
            .clone()
            .ok_or(RollDiceError::NotInRoom)?;
        if room.is_some_and(|requested| requested != current.as_str()) {
            return Err(RollDiceError::NotInRoom);
        }

        let roll = DiceRoll {
            room: current.clone(),
            roller: connection.identity.clone(),
            die_size,
            outcome: dice::roll_die(die_size),
            timestamp: Timestamp::now(),
        };
        let text = format!(
            "{} rolled {}: {}",
            roll.roller.username, roll.die_size, roll.outcome
        );
        BroadcastDispatcher::to_room(&mut tables, &current, Notification::DiceResult(roll.clone()));
        BroadcastDispatcher::to_room(
            &mut tables,
            &current,
            Notification::system(Some(current.clone()), text),
        );

        tracing::debug!(
            connection = %connection_id,
            room = %current,
            die = %roll.die_size,
            outcome = roll.outcome,
            "dice rolled"
        );
        Ok(roll)
    }
}
