//! PostgreSQL-backed menu items and role grants.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use peoplehub_application::MenuRepository;
use peoplehub_core::{AppError, AppResult, Role};
use peoplehub_domain::MenuItem;

/// PostgreSQL implementation of the menu repository port.
#[derive(Clone)]
pub struct PostgresMenuRepository {
    pool: PgPool,
}

impl PostgresMenuRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    code: String,
    parent_code: Option<String>,
    label: String,
    path: Option<String>,
    icon: Option<String>,
    position: i32,
    roles: Vec<String>,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = AppError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let roles = row
            .roles
            .iter()
            .map(|role| role.parse::<Role>())
            .collect::<AppResult<BTreeSet<Role>>>()?;

        MenuItem::new(
            row.code,
            row.parent_code,
            row.label,
            row.path,
            row.icon,
            row.position,
            roles,
        )
    }
}

#[async_trait]
impl MenuRepository for PostgresMenuRepository {
    async fn list_items(&self) -> AppResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT m.code, m.parent_code, m.label, m.path, m.icon, m.position,
                   COALESCE(
                       array_agg(r.role ORDER BY r.role) FILTER (WHERE r.role IS NOT NULL),
                       ARRAY[]::text[]
                   ) AS roles
            FROM menu_items m
            LEFT JOIN menu_item_roles r ON r.menu_code = m.code
            GROUP BY m.code
            ORDER BY m.position, m.code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list menu items: {error}")))?;

        rows.into_iter().map(MenuItem::try_from).collect()
    }

    async fn replace_roles(&self, code: &str, roles: &BTreeSet<Role>) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start menu grant transaction: {error}"))
        })?;

        let locked = sqlx::query_scalar::<_, String>(
            "SELECT code FROM menu_items WHERE code = $1 FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load menu item: {error}")))?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("menu item '{code}' not found")));
        }

        sqlx::query("DELETE FROM menu_item_roles WHERE menu_code = $1")
            .bind(code)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear menu grants: {error}"))
            })?;

        let role_names: Vec<&str> = roles.iter().map(Role::as_str).collect();
        sqlx::query(
            r#"
            INSERT INTO menu_item_roles (menu_code, role)
            SELECT $1, role FROM UNNEST($2::text[]) AS granted(role)
            "#,
        )
        .bind(code)
        .bind(role_names)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert menu grants: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit menu grants: {error}"))
        })?;

        Ok(())
    }
}
