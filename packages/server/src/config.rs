//! Command line and environment configuration.

use std::time::Duration;

use clap::Parser;

use crate::ui::state::GatewayTimeouts;

/// Tavern chat and dice coordinator
#[derive(Debug, Clone, Parser)]
#[command(name = "tavern-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Shared secret for HS256 bearer tokens
    #[arg(long, env = "TAVERN_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Seconds an unauthenticated socket may wait before sending `authenticate`
    #[arg(long, default_value_t = 10)]
    pub auth_timeout_secs: u64,

    /// Seconds of inbound silence before a connection is closed
    #[arg(long, default_value_t = 60)]
    pub idle_timeout_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeouts(&self) -> GatewayTimeouts {
        GatewayTimeouts {
            auth: Duration::from_secs(self.auth_timeout_secs),
            idle: Duration::from_secs(self.idle_timeout_secs),
        }
    }
}
