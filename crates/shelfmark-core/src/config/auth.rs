//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_minutes: u64,
    /// Refresh token lifetime, configured as a day count.
    #[serde(default = "default_refresh_lifetime")]
    pub refresh_token_lifetime: u64,
    /// Minimum password length for reset passwords.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expiry_minutes: default_jwt_expiry(),
            refresh_token_lifetime: default_refresh_lifetime(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_expiry() -> u64 {
    15
}

fn default_refresh_lifetime() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}
