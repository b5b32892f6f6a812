//! HS256 JSON Web Token identity provider.
//!
//! Tokens are issued by the account service with a shared secret. Claims
//! carry the user id (`sub`), the display name and an optional character
//! name; `exp` is always validated.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Identity, IdentityError, IdentityProvider};

/// Claims expected in a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub username: String,
    #[serde(default)]
    pub character_name: Option<String>,
    /// Expiry, seconds since the Unix epoch
    pub exp: u64,
}

pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Sign claims with the shared secret.
    ///
    /// Used by tooling and tests; production tokens come from the account service.
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, IdentityError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| IdentityError::AuthenticationFailed(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn validate(&self, bearer_token: &str) -> Result<Identity, IdentityError> {
        let data = decode::<TokenClaims>(bearer_token, &self.decoding_key, &self.validation)
            .map_err(|e| IdentityError::AuthenticationFailed(e.to_string()))?;
        let claims = data.claims;
        Identity::new(claims.sub, claims.username, claims.character_name)
            .map_err(|e| IdentityError::AuthenticationFailed(e.to_string()))
    }
}
