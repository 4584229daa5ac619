//! Token repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shelfmark_core::error::{AppError, ErrorKind};
use shelfmark_core::result::AppResult;
use shelfmark_entity::token::{Token, TokenKind};

use crate::traits::TokenStore;

/// Repository for token records.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn create(&self, token: &Token) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tokens (id, user_id, token, kind, expires, revoked, revoked_by_ip, \
             created_by_ip, replaced_by_token, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.token)
        .bind(token.kind)
        .bind(token.expires)
        .bind(token.revoked)
        .bind(&token.revoked_by_ip)
        .bind(&token.created_by_ip)
        .bind(&token.replaced_by_token)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create token", e))?;
        Ok(())
    }

    async fn find_refresh(&self, value: &str) -> AppResult<Option<Token>> {
        sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE token = $1 AND kind = $2")
            .bind(value)
            .bind(TokenKind::Refresh)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    async fn revoke(&self, id: Uuid, revoked_by_ip: &str) -> AppResult<()> {
        // Guarded on `revoked = FALSE` so a second call cannot overwrite
        // the original revocation IP.
        sqlx::query(
            "UPDATE tokens SET revoked = TRUE, revoked_by_ip = $2 \
             WHERE id = $1 AND revoked = FALSE",
        )
        .bind(id)
        .bind(revoked_by_ip)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE expires <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired tokens", e)
            })?;

        Ok(result.rows_affected())
    }
}
