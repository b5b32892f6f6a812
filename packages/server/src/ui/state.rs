//! Server state shared by every handler.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{IdentityProvider, SessionRepository},
    usecase::{
        ConnectUseCase, MembershipManager, QueryUseCase, RollDiceUseCase, SendMessageUseCase,
    },
};

/// Time limits enforced by the session gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayTimeouts {
    /// How long an unauthenticated socket may stay open
    pub auth: Duration,
    /// Maximum silence between two inbound frames
    pub idle: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            auth: Duration::from_secs(10),
            idle: Duration::from_secs(60),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Repository（接続一覧とルーム一覧、HTTP の参照系からも使う）
    pub repository: Arc<dyn SessionRepository>,
    /// Bearer トークンの検証
    pub identity: Arc<dyn IdentityProvider>,
    pub timeouts: GatewayTimeouts,
    pub connect: ConnectUseCase,
    pub membership: MembershipManager,
    pub messages: SendMessageUseCase,
    pub dice: RollDiceUseCase,
    pub queries: QueryUseCase,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        identity: Arc<dyn IdentityProvider>,
        timeouts: GatewayTimeouts,
    ) -> Self {
        Self {
            connect: ConnectUseCase::new(repository.clone()),
            membership: MembershipManager::new(repository.clone()),
            messages: SendMessageUseCase::new(repository.clone()),
            dice: RollDiceUseCase::new(repository.clone()),
            queries: QueryUseCase::new(repository.clone()),
            repository,
            identity,
            timeouts,
        }
    }
}
