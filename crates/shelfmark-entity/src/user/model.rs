//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::overrides::PermissionOverrides;

/// A registered staff user of the library platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address (unique, used for login and reset delivery).
    pub email: String,
    /// Staff employee number (unique, alternate login identifier).
    pub employee_number: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Assigned roles, as an ordered list of role references.
    /// Order carries no semantics.
    pub roles: Vec<Uuid>,
    /// Per-user permission overrides layered on role permissions.
    #[sqlx(json)]
    pub permission_overrides: PermissionOverrides,
    /// SHA-256 hex digest of the pending reset token, if any.
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    /// When the pending reset token expires.
    pub reset_password_expires: Option<DateTime<Utc>>,
    /// Last successful login time.
    pub last_login: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// The actor who last updated this user's overrides or credentials.
    pub updated_by: Option<Uuid>,
}

impl User {
    /// Whether a password reset is currently pending for this user.
    pub fn has_reset_pending(&self, now: DateTime<Utc>) -> bool {
        match (&self.reset_password_token, self.reset_password_expires) {
            (Some(_), Some(expires)) => expires > now,
            _ => false,
        }
    }

    /// Clears any pending reset token state in memory.
    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expires = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_reset(expires: Option<DateTime<Utc>>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "staff@library.test".to_string(),
            employee_number: "EMP-001".to_string(),
            password_hash: "hash".to_string(),
            roles: Vec::new(),
            permission_overrides: PermissionOverrides::new(),
            reset_password_token: expires.map(|_| "digest".to_string()),
            reset_password_expires: expires,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            updated_by: None,
        }
    }

    #[test]
    fn reset_pending_requires_future_expiry() {
        let now = Utc::now();
        assert!(user_with_reset(Some(now + Duration::minutes(10))).has_reset_pending(now));
        assert!(!user_with_reset(Some(now - Duration::minutes(1))).has_reset_pending(now));
        assert!(!user_with_reset(None).has_reset_pending(now));
    }

    #[test]
    fn clear_reset_token_drops_both_fields() {
        let mut user = user_with_reset(Some(Utc::now() + Duration::minutes(30)));
        user.clear_reset_token();
        assert!(user.reset_password_token.is_none());
        assert!(user.reset_password_expires.is_none());
    }
}
