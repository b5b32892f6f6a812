//! Identity collaborator.
//!
//! The coordinator treats bearer credentials as opaque and asks an
//! [`IdentityProvider`] to turn them into an [`Identity`].

use async_trait::async_trait;

use super::{entity::Identity, error::IdentityError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::AuthenticationFailed` for any token that does
    /// not identify an active user.
    async fn validate(&self, bearer_token: &str) -> Result<Identity, IdentityError>;
}
