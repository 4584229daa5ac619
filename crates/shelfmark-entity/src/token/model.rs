//! Token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::TokenKind;

/// A persisted credential token owned by exactly one user.
///
/// Lifecycle: `issued → (revoked | expired)` — both terminal states are
/// absorbing; there is no transition back to valid. Tokens live in their
/// own collection so expiry handling is independent of the user record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Token {
    /// Unique token record identifier.
    pub id: Uuid,
    /// The user this token belongs to.
    pub user_id: Uuid,
    /// Opaque secret: random hex for refresh tokens, digest for reset.
    #[serde(skip_serializing)]
    pub token: String,
    /// Token kind.
    pub kind: TokenKind,
    /// When the token expires.
    pub expires: DateTime<Utc>,
    /// Whether the token has been revoked.
    pub revoked: bool,
    /// IP address that requested revocation.
    pub revoked_by_ip: Option<String>,
    /// IP address the token was issued to.
    pub created_by_ip: String,
    /// Forward link to a superseding token (rotation; declared but not
    /// written by current flows).
    pub replaced_by_token: Option<String>,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl Token {
    /// Whether the token has passed its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// Whether the token is still usable: neither revoked nor expired.
    ///
    /// Validity is always re-checked against `expires`; it never relies
    /// on expired rows having been purged.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn refresh_token(expires: DateTime<Utc>, revoked: bool) -> Token {
        Token {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "deadbeef".to_string(),
            kind: TokenKind::Refresh,
            expires,
            revoked,
            revoked_by_ip: None,
            created_by_ip: "127.0.0.1".to_string(),
            replaced_by_token: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn active_requires_unrevoked_and_unexpired() {
        let now = Utc::now();
        assert!(refresh_token(now + Duration::minutes(5), false).is_active(now));
        assert!(!refresh_token(now + Duration::minutes(5), true).is_active(now));
        assert!(!refresh_token(now - Duration::seconds(1), false).is_active(now));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let token = refresh_token(now, false);
        assert!(token.is_expired(now));
        assert!(!token.is_active(now));
    }
}
