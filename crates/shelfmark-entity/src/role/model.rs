//! Role entity model.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named bundle of permissions shared across many users.
///
/// Users reference roles; they never own them. Role permissions are
/// re-read on every resolution, so edits here take effect immediately
/// for every member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name (e.g. `"Librarian"`, `"Branch Manager"`).
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Permission names this role carries.
    #[sqlx(json)]
    pub permissions: HashSet<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Whether this role carries the given permission name.
    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.contains(name)
    }
}
