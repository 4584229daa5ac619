//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log entry recording a credential action.
///
/// Entries are written through the fire-and-forget notifier only; a
/// failed write never surfaces to the operation that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// The action performed (e.g. `"auth.login"`, `"permission.grant"`).
    pub action: String,
    /// The type of target record (e.g. `"user"`, `"token"`).
    pub target_type: String,
    /// The target record ID (if applicable).
    pub target_id: Option<Uuid>,
    /// Additional details about the action (JSON).
    pub details: Option<serde_json::Value>,
    /// IP address of the actor.
    pub ip_address: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Creates a new entry stamped with the current time.
    pub fn new(
        actor_id: Uuid,
        action: impl Into<String>,
        target_type: impl Into<String>,
        target_id: Option<Uuid>,
        details: Option<serde_json::Value>,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            action: action.into(),
            target_type: target_type.into(),
            target_id,
            details,
            ip_address,
            created_at: Utc::now(),
        }
    }
}
