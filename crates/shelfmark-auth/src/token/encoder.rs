//! Access token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use shelfmark_core::config::auth::AuthConfig;
use shelfmark_core::error::AppError;
use shelfmark_entity::user::User;

use super::claims::AccessClaims;

/// Creates signed access tokens.
#[derive(Clone)]
pub struct AccessTokenEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL in minutes.
    expiry_minutes: i64,
}

impl std::fmt::Debug for AccessTokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenEncoder")
            .field("expiry_minutes", &self.expiry_minutes)
            .finish()
    }
}

impl AccessTokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry_minutes: config.jwt_expiry_minutes as i64,
        }
    }

    /// Signs an access token for the given user.
    ///
    /// Returns the token string and its expiry instant.
    pub fn encode(&self, user: &User) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires = now + chrono::Duration::minutes(self.expiry_minutes);

        let claims = AccessClaims {
            sub: user.id,
            roles: user.roles.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, expires))
    }
}
