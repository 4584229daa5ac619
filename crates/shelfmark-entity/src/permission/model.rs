//! Permission catalog entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::PermissionCategory;

/// An entry in the permission catalog.
///
/// Inactive permissions are excluded when validating override requests
/// but may remain referenced by historical role or override data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Unique permission name (e.g. `"canViewItem"`).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Functional area this permission belongs to.
    pub category: PermissionCategory,
    /// Whether this permission may be used in new override requests.
    pub is_active: bool,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Creates a new active permission catalog entry.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: PermissionCategory,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            category,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
