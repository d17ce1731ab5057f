use super::*;

/// Advisory lock key held while creating the first administrator.
const BOOTSTRAP_LOCK_KEY: i64 = 0x7065_6f70_6c65;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUser) -> AppResult<UserId> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO users (username, display_name, password_hash, role, employee_id)
            VALUES (LOWER($1), $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.username)
        .bind(user.display_name)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .bind(user.employee_id.map(|employee_id| employee_id.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| username_conflict_or_internal(error, "create user"))?;

        Ok(UserId::from_uuid(id))
    }

    pub(super) async fn create_if_no_admin_impl(&self, user: NewUser) -> AppResult<Option<UserId>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start bootstrap transaction: {error}"))
        })?;

        // Serialises concurrent bootstraps until commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOTSTRAP_LOCK_KEY)
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to take bootstrap lock: {error}")))?;

        let admin_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE role = 'admin')",
        )
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check for admins: {error}")))?;
        if admin_exists {
            return Ok(None);
        }

        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO users (username, display_name, password_hash, role, employee_id)
            VALUES (LOWER($1), $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.username)
        .bind(user.display_name)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .bind(user.employee_id.map(|employee_id| employee_id.as_uuid()))
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| username_conflict_or_internal(error, "create bootstrap admin"))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit bootstrap admin: {error}"))
        })?;

        Ok(Some(UserId::from_uuid(id)))
    }

    pub(super) async fn update_password_impl(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, password_changed_at = now(), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        ensure_updated(result.rows_affected(), user_id)
    }

    pub(super) async fn increment_failed_logins_impl(&self, user_id: UserId) -> AppResult<i32> {
        // Single statement so concurrent failures cannot lose an increment.
        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
            SET failed_login_count = failed_login_count + 1, updated_at = now()
            WHERE id = $1
            RETURNING failed_login_count
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to record failed login: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }

    pub(super) async fn lock_until_impl(
        &self,
        user_id: UserId,
        locked_until: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET locked_until = $2, failed_login_count = 0, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(locked_until)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock user: {error}")))?;

        ensure_updated(result.rows_affected(), user_id)
    }

    pub(super) async fn record_successful_login_impl(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET failed_login_count = 0, locked_until = NULL, last_login_at = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to record successful login: {error}"))
        })?;

        ensure_updated(result.rows_affected(), user_id)
    }

    pub(super) async fn clear_lockout_impl(&self, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET failed_login_count = 0, locked_until = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear lockout: {error}")))?;

        ensure_updated(result.rows_affected(), user_id)
    }

    pub(super) async fn update_role_impl(&self, user_id: UserId, role: Role) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update role: {error}")))?;

        ensure_updated(result.rows_affected(), user_id)
    }

    pub(super) async fn set_active_impl(&self, user_id: UserId, is_active: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update account status: {error}"))
        })?;

        ensure_updated(result.rows_affected(), user_id)
    }
}
