//! PostgreSQL aggregates backing the dashboard widgets.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;

use peoplehub_application::{
    DashboardRepository, DepartmentSummary, EmployeeRecord, HeadcountSummary, SecuritySummary,
};
use peoplehub_core::{AppError, AppResult};

use crate::postgres_employee_repository::{
    DEPARTMENT_SELECT, DepartmentRow, EMPLOYEE_SELECT, EmployeeRow, into_records,
};

/// PostgreSQL implementation of the dashboard repository port.
#[derive(Clone)]
pub struct PostgresDashboardRepository {
    pool: PgPool,
}

impl PostgresDashboardRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HeadcountRow {
    active: i64,
    on_leave: i64,
    terminated: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SecurityRow {
    total_users: i64,
    active_users: i64,
    locked_users: i64,
    active_sessions: i64,
    failed_logins_last_24h: i64,
}

#[async_trait]
impl DashboardRepository for PostgresDashboardRepository {
    async fn headcount_summary(&self) -> AppResult<HeadcountSummary> {
        let row = sqlx::query_as::<_, HeadcountRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE status = 'on_leave') AS on_leave,
                COUNT(*) FILTER (WHERE status = 'terminated') AS terminated
            FROM employees
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count headcount: {error}")))?;

        Ok(HeadcountSummary {
            active: row.active,
            on_leave: row.on_leave,
            terminated: row.terminated,
        })
    }

    async fn department_breakdown(&self) -> AppResult<Vec<DepartmentSummary>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(DEPARTMENT_SELECT)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load department breakdown: {error}"))
            })?;

        Ok(rows.into_iter().map(DepartmentSummary::from).collect())
    }

    async fn recent_hires(&self, limit: i64) -> AppResult<Vec<EmployeeRecord>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            r#"
            {EMPLOYEE_SELECT}
            WHERE e.status <> 'terminated'
            ORDER BY e.hire_date DESC, e.full_name
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list recent hires: {error}")))?;

        into_records(rows)
    }

    async fn security_summary(&self, now: DateTime<Utc>) -> AppResult<SecuritySummary> {
        let row = sqlx::query_as::<_, SecurityRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE is_active) AS active_users,
                (SELECT COUNT(*) FROM users WHERE locked_until > $1) AS locked_users,
                (
                    SELECT COUNT(*)
                    FROM user_sessions
                    WHERE revoked_at IS NULL AND expires_at > $1
                ) AS active_sessions,
                (
                    SELECT COUNT(*)
                    FROM auth_events
                    WHERE event_type = 'login_attempt'
                      AND outcome <> 'success'
                      AND created_at > $2
                ) AS failed_logins_last_24h
            "#,
        )
        .bind(now)
        .bind(now - TimeDelta::hours(24))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load security summary: {error}"))
        })?;

        Ok(SecuritySummary {
            total_users: row.total_users,
            active_users: row.active_users,
            locked_users: row.locked_users,
            active_sessions: row.active_sessions,
            failed_logins_last_24h: row.failed_logins_last_24h,
        })
    }
}
