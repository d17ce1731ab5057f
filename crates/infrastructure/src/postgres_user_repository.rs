//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use peoplehub_application::{NewUser, UserRecord, UserRepository};
use peoplehub_core::{AppError, AppResult, Role};
use peoplehub_domain::{EmployeeId, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    username: String,
    display_name: String,
    password_hash: String,
    role: String,
    is_active: bool,
    employee_id: Option<uuid::Uuid>,
    failed_login_count: i32,
    locked_until: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role: row.role.parse::<Role>()?,
            is_active: row.is_active,
            employee_id: row.employee_id.map(EmployeeId::from_uuid),
            failed_login_count: row.failed_login_count,
            locked_until: row.locked_until,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = r#"
    id, username, display_name, password_hash, role, is_active, employee_id,
    failed_login_count, locked_until, last_login_at, created_at
"#;

mod account;
mod lookup;


#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_username_impl(username).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        self.list_users_impl().await
    }

    async fn create(&self, user: NewUser) -> AppResult<UserId> {
        self.create_impl(user).await
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        self.update_password_impl(user_id, password_hash).await
    }

    async fn increment_failed_logins(&self, user_id: UserId) -> AppResult<i32> {
        self.increment_failed_logins_impl(user_id).await
    }

    async fn lock_until(&self, user_id: UserId, locked_until: DateTime<Utc>) -> AppResult<()> {
        self.lock_until_impl(user_id, locked_until).await
    }

    async fn record_successful_login(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.record_successful_login_impl(user_id, at).await
    }

    async fn clear_lockout(&self, user_id: UserId) -> AppResult<()> {
        self.clear_lockout_impl(user_id).await
    }

    async fn update_role(&self, user_id: UserId, role: Role) -> AppResult<()> {
        self.update_role_impl(user_id, role).await
    }

    async fn set_active(&self, user_id: UserId, is_active: bool) -> AppResult<()> {
        self.set_active_impl(user_id, is_active).await
    }

    async fn count_admins(&self) -> AppResult<i64> {
        self.count_admins_impl().await
    }

    async fn create_if_no_admin(&self, user: NewUser) -> AppResult<Option<UserId>> {
        self.create_if_no_admin_impl(user).await
    }
}

fn username_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(
            "username is already taken or employee is already linked".to_owned(),
        );
    }

    warn!(operation, %error, "user write failed");
    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn ensure_updated(rows_affected: u64, user_id: UserId) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("user '{user_id}' not found")));
    }

    Ok(())
}
