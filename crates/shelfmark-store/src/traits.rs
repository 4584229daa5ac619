//! Store ports consumed by the credential engines.
//!
//! Every engine talks to persistence through these traits so the
//! PostgreSQL repositories and the in-memory backend stay
//! interchangeable. Mutations on the user record are field-scoped and
//! atomic per statement; see the repository implementations.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shelfmark_core::result::AppResult;
use shelfmark_entity::audit::AuditLogEntry;
use shelfmark_entity::permission::Permission;
use shelfmark_entity::role::Role;
use shelfmark_entity::token::Token;
use shelfmark_entity::user::{PermissionOverrides, User};

/// User record lookup and field-scoped updates.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Persists a new user. Fails with a conflict on duplicate email or
    /// employee number.
    async fn create(&self, user: &User) -> AppResult<()>;

    /// Finds a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Finds a user by login identifier: email or employee number.
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;

    /// Finds the user whose stored reset digest matches and whose reset
    /// expiry is still in the future.
    async fn find_by_reset_token_hash(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// Records a successful login time.
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Replaces the user's permission overrides in a single atomic
    /// field update keyed by user id, recording the acting user.
    async fn update_permission_overrides(
        &self,
        id: Uuid,
        overrides: &PermissionOverrides,
        updated_by: Uuid,
    ) -> AppResult<()>;

    /// Stores a reset token digest and its expiry on the user.
    async fn set_reset_token(
        &self,
        id: Uuid,
        digest: &str,
        expires: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Clears any pending reset token state.
    async fn clear_reset_token(&self, id: Uuid) -> AppResult<()>;

    /// Sets a new password hash and clears the reset token fields in
    /// the same statement, so a consumed reset token cannot be replayed.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;
}

/// Role record lookup.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Persists a new role.
    async fn create(&self, role: &Role) -> AppResult<()>;

    /// Finds a role by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Fetches the roles for the given references. Unknown references
    /// are skipped (stale assignments must not poison resolution).
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Role>>;
}

/// Permission catalog lookup.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Persists a new catalog entry.
    async fn create(&self, permission: &Permission) -> AppResult<()>;

    /// Finds a catalog entry by its unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    /// Returns the names of all active catalog entries.
    async fn find_active_names(&self) -> AppResult<HashSet<String>>;
}

/// Token record persistence and lifecycle updates.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Persists a newly issued token.
    async fn create(&self, token: &Token) -> AppResult<()>;

    /// Finds a refresh token by its opaque value.
    async fn find_refresh(&self, value: &str) -> AppResult<Option<Token>>;

    /// Marks a token revoked, recording the requesting IP. A second
    /// revocation of the same token is a no-op.
    async fn revoke(&self, id: Uuid, revoked_by_ip: &str) -> AppResult<()>;

    /// Physically removes token rows at or past expiry. Validity checks
    /// never depend on this having run.
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Append-only audit log sink.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    /// Appends an audit entry.
    async fn append(&self, entry: &AuditLogEntry) -> AppResult<()>;
}
