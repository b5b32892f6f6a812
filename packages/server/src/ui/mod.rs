//! UI 層
//!
//! WebSocket の Session Gateway と HTTP API を提供します。

mod handler;
mod runner;
mod signal;
pub mod state;

pub use handler::auth::{GatewayError, bearer_token};
pub use runner::{build_router, run, serve_with_shutdown};
