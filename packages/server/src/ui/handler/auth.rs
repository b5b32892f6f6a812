//! Authentication window of the session gateway.
//!
//! A socket authenticates either with the `Authorization: Bearer` header of
//! the upgrade request or with an `authenticate` event as its first frame.
//! Nothing is registered until one of them succeeds.

use std::time::Duration;

use axum::{
    extract::ws::Message,
    http::{HeaderMap, header},
};
use futures_util::{Stream, StreamExt};
use thiserror::Error;

use crate::{
    domain::{Identity, IdentityProvider},
    infrastructure::dto::websocket::ClientEvent,
};

/// Errors raised before a connection is registered
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("no authenticate event within {0:?}")]
    AuthenticationTimeout(Duration),
}

impl GatewayError {
    /// Value of the `code` field of the `error` event
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::AuthenticationTimeout(_) => "authentication_timeout",
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Resolve the identity of a fresh socket.
///
/// A header token is validated directly; otherwise the first frame must be an
/// `authenticate` event arriving within `window`.
pub async fn authenticate<S>(
    receiver: &mut S,
    header_token: Option<String>,
    provider: &dyn IdentityProvider,
    window: Duration,
) -> Result<Identity, GatewayError>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let token = match header_token {
        Some(token) => token,
        None => tokio::time::timeout(window, first_token(receiver))
            .await
            .map_err(|_| GatewayError::AuthenticationTimeout(window))??,
    };
    provider
        .validate(&token)
        .await
        .map_err(|error| GatewayError::AuthenticationFailed(error.to_string()))
}

async fn first_token<S>(receiver: &mut S) -> Result<String, GatewayError>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    while let Some(frame) = receiver.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            // keep-alives do not count as the first event
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            Ok(Message::Binary(_)) => return Err(failed("binary frames are not supported".into())),
            Ok(Message::Close(_)) => return Err(failed("closed before authenticating".into())),
            Err(error) => return Err(failed(format!("transport error: {error}"))),
        };
        return match serde_json::from_str::<ClientEvent>(&text) {
            Ok(ClientEvent::Authenticate { token }) => Ok(token),
            Ok(other) => Err(failed(format!(
                "expected authenticate, got {}",
                other.kind()
            ))),
            Err(error) => Err(failed(format!("malformed event: {error}"))),
        };
    }
    Err(failed("closed before authenticating".into()))
}

fn failed(reason: String) -> GatewayError {
    GatewayError::AuthenticationFailed(reason)
}
