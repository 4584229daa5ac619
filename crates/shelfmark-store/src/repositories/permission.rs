//! Permission catalog repository implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;

use shelfmark_core::error::{AppError, ErrorKind};
use shelfmark_core::result::AppResult;
use shelfmark_entity::permission::Permission;

use crate::traits::PermissionStore;

/// Repository for the permission catalog.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn create(&self, permission: &Permission) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO permissions (id, name, description, category, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(permission.id)
        .bind(&permission.name)
        .bind(&permission.description)
        .bind(permission.category)
        .bind(permission.is_active)
        .bind(permission.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                AppError::conflict("A permission with that name already exists")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create permission", e)
            }
        })?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission", e)
            })
    }

    async fn find_active_names(&self) -> AppResult<HashSet<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM permissions WHERE is_active = TRUE")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to list active permissions",
                        e,
                    )
                })?;

        Ok(names.into_iter().collect())
    }
}
