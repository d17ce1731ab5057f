//! PostgreSQL-backed session repository.
//!
//! Rows are keyed by the SHA-256 digest of the bearer token; the raw token
//! never reaches the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use peoplehub_application::{NewSession, SessionRecord, SessionRepository};
use peoplehub_core::{AppError, AppResult};
use peoplehub_domain::{SessionId, UserId};

#[cfg(test)]
mod tests;

/// PostgreSQL implementation of the session repository port.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    created_at: DateTime<Utc>,
    last_seen_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    absolute_expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            created_at: row.created_at,
            last_seen_at: row.last_seen_at,
            expires_at: row.expires_at,
            absolute_expires_at: row.absolute_expires_at,
            revoked_at: row.revoked_at,
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: NewSession) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (
                id,
                user_id,
                token_hash,
                created_at,
                last_seen_at,
                expires_at,
                absolute_expires_at,
                ip_address,
                user_agent
            )
            VALUES ($1, $2, $3, $4, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(session.user_id.as_uuid())
        .bind(session.token_hash)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.absolute_expires_at)
        .bind(session.ip_address)
        .bind(session.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create session: {error}")))?;

        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<SessionRecord>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, created_at, last_seen_at, expires_at, absolute_expires_at, revoked_at
            FROM user_sessions
            WHERE token_hash = $1
            LIMIT 1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find session: {error}")))?;

        Ok(row.map(SessionRecord::from))
    }

    async fn touch(
        &self,
        session_id: SessionId,
        last_seen_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE user_sessions
            SET last_seen_at = $2, expires_at = LEAST($3, absolute_expires_at)
            WHERE id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(last_seen_at)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to touch session: {error}")))?;

        Ok(())
    }

    async fn revoke(&self, session_id: SessionId, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE user_sessions
            SET revoked_at = $2
            WHERE id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke session: {error}")))?;

        Ok(())
    }

    async fn revoke_all_for_user(
        &self,
        user_id: UserId,
        except: Option<SessionId>,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE user_sessions
            SET revoked_at = $3
            WHERE user_id = $1
              AND revoked_at IS NULL
              AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(except.map(|session_id| session_id.as_uuid()))
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke user sessions: {error}")))?;

        Ok(result.rows_affected())
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_sessions
            WHERE expires_at < $1
               OR (revoked_at IS NOT NULL AND revoked_at < $1)
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to purge sessions: {error}")))?;

        Ok(result.rows_affected())
    }
}
