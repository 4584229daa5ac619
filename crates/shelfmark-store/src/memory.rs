//! In-memory credential store using a Tokio mutex.
//!
//! Implements every store port over plain maps. Suitable for tests and
//! single-node development; mutations serialize on the mutex, so the
//! field-update operations carry the same atomicity as the PostgreSQL
//! statements.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use shelfmark_core::error::AppError;
use shelfmark_core::result::AppResult;
use shelfmark_entity::audit::AuditLogEntry;
use shelfmark_entity::permission::Permission;
use shelfmark_entity::role::Role;
use shelfmark_entity::token::{Token, TokenKind};
use shelfmark_entity::user::{PermissionOverrides, User};

use crate::traits::{AuditStore, PermissionStore, RoleStore, TokenStore, UserStore};

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct InnerState {
    users: HashMap<Uuid, User>,
    roles: HashMap<Uuid, Role>,
    permissions: HashMap<Uuid, Permission>,
    tokens: HashMap<Uuid, Token>,
    audit: Vec<AuditLogEntry>,
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Creates an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all audit entries written so far.
    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.state.lock().await.audit.clone()
    }

    /// Returns the number of token records currently held.
    pub async fn token_count(&self) -> usize {
        self.state.lock().await.tokens.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let duplicate = state.users.values().any(|u| {
            u.email.eq_ignore_ascii_case(&user.email) || u.employee_number == user.employee_number
        });
        if duplicate {
            return Err(AppError::conflict(
                "A user with that email or employee number already exists",
            ));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(identifier) || u.employee_number == identifier)
            .cloned())
    }

    async fn find_by_reset_token_hash(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| {
                u.reset_password_token.as_deref() == Some(digest)
                    && u.reset_password_expires.is_some_and(|e| e > now)
            })
            .cloned())
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn update_permission_overrides(
        &self,
        id: Uuid,
        overrides: &PermissionOverrides,
        updated_by: Uuid,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.permission_overrides = overrides.clone();
        user.updated_by = Some(updated_by);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        digest: &str,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.reset_password_token = Some(digest.to_string());
            user.reset_password_expires = Some(expires);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.clear_reset_token();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.password_hash = password_hash.to_string();
        user.clear_reset_token();
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn create(&self, role: &Role) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.roles.values().any(|r| r.name == role.name) {
            return Err(AppError::conflict("A role with that name already exists"));
        }
        state.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.state.lock().await.roles.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.roles.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn create(&self, permission: &Permission) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.permissions.values().any(|p| p.name == permission.name) {
            return Err(AppError::conflict(
                "A permission with that name already exists",
            ));
        }
        state.permissions.insert(permission.id, permission.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let state = self.state.lock().await;
        Ok(state.permissions.values().find(|p| p.name == name).cloned())
    }

    async fn find_active_names(&self) -> AppResult<HashSet<String>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .values()
            .filter(|p| p.is_active)
            .map(|p| p.name.clone())
            .collect())
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn create(&self, token: &Token) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find_refresh(&self, value: &str) -> AppResult<Option<Token>> {
        let state = self.state.lock().await;
        Ok(state
            .tokens
            .values()
            .find(|t| t.kind == TokenKind::Refresh && t.token == value)
            .cloned())
    }

    async fn revoke(&self, id: Uuid, revoked_by_ip: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(token) = state.tokens.get_mut(&id) {
            if !token.revoked {
                token.revoked = true;
                token.revoked_by_ip = Some(revoked_by_ip.to_string());
            }
        }
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.tokens.len();
        state.tokens.retain(|_, t| t.expires > now);
        Ok((before - state.tokens.len()) as u64)
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, entry: &AuditLogEntry) -> AppResult<()> {
        self.state.lock().await.audit.push(entry.clone());
        Ok(())
    }
}
