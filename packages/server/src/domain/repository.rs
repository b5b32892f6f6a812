//! Repository trait for the session tables.
//!
//! Use cases depend on this trait (domain layer) rather than on the
//! in-memory implementation in the infrastructure layer.

use async_trait::async_trait;
use tokio::sync::MutexGuard;

use super::{entity::RoomSummary, session::SessionTables};

/// Exclusive access to the session tables for the duration of one transition.
pub type SessionGuard<'a> = MutexGuard<'a, SessionTables>;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Acquire the session lock.
    ///
    /// Holders must not `.await` while the guard is alive.
    async fn lock<'a>(&'a self) -> SessionGuard<'a>;

    /// Snapshot of the rooms that currently have members
    async fn active_rooms(&self) -> Vec<RoomSummary> {
        self.lock().await.rooms.list_active()
    }

    async fn connection_count(&self) -> usize {
        self.lock().await.connections.len()
    }

    /// Disconnect every remaining connection, closing their outbound queues.
    ///
    /// Returns how many connections were removed.
    async fn teardown(&self) -> usize {
        let mut tables = self.lock().await;
        let mut closed = 0;
        for id in tables.connections.ids() {
            if tables.disconnect(&id).is_some() {
                closed += 1;
            }
        }
        closed
    }
}
