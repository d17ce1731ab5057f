use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use peoplehub_application::{AuthEvent, AuthEventEntry, AuthEventRepository};
use peoplehub_core::{AppError, AppResult};

/// PostgreSQL-backed repository for authentication events.
#[derive(Clone)]
pub struct PostgresAuthEventRepository {
    pool: PgPool,
}

impl PostgresAuthEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuthEventRow {
    id: i64,
    subject: Option<String>,
    event_type: String,
    outcome: String,
    detail: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AuthEventRow> for AuthEventEntry {
    fn from(row: AuthEventRow) -> Self {
        Self {
            id: row.id,
            subject: row.subject,
            event_type: row.event_type,
            outcome: row.outcome,
            detail: row.detail,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AuthEventRepository for PostgresAuthEventRepository {
    async fn append_event(&self, event: AuthEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_events (
                subject,
                event_type,
                outcome,
                detail,
                ip_address,
                user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.subject)
        .bind(event.event_type)
        .bind(event.outcome)
        .bind(event.detail)
        .bind(event.ip_address)
        .bind(event.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append auth event: {error}")))?;

        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<AuthEventEntry>> {
        let rows = sqlx::query_as::<_, AuthEventRow>(
            r#"
            SELECT id, subject, event_type, outcome, detail, ip_address, user_agent, created_at
            FROM auth_events
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list auth events: {error}")))?;

        Ok(rows.into_iter().map(AuthEventEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use peoplehub_application::{AuthEvent, AuthEventRepository};

    use super::PostgresAuthEventRepository;
    use crate::test_database::{test_pool, unique};

    #[tokio::test]
    async fn appended_events_are_listed_newest_first() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repository = PostgresAuthEventRepository::new(pool);
        let subject = unique("events");

        for outcome in ["invalid_password", "success"] {
            let appended = repository
                .append_event(AuthEvent {
                    subject: Some(subject.clone()),
                    event_type: "login_attempt".to_owned(),
                    outcome: outcome.to_owned(),
                    detail: None,
                    ip_address: Some("198.51.100.4".to_owned()),
                    user_agent: None,
                })
                .await;
            assert!(appended.is_ok());
        }

        let events = repository.list_recent(500).await.unwrap_or_default();
        let mine: Vec<&str> = events
            .iter()
            .filter(|event| event.subject.as_deref() == Some(subject.as_str()))
            .map(|event| event.outcome.as_str())
            .collect();
        assert_eq!(mine, vec!["success", "invalid_password"]);
    }
}
