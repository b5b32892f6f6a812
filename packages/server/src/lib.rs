//! Tavern server library.
//!
//! Room-based real-time coordinator for a tabletop-game chat: authenticated
//! WebSocket sessions, named rooms, sequenced chat messages and dice rolls.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{run, serve_with_shutdown};
