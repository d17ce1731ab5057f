//! Shared PostgreSQL fixtures for repository tests.
//!
//! Tests are skipped when `DATABASE_URL` is not set.

use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for repository tests: {error}");
    }

    Some(pool)
}

/// Returns a short random suffix so parallel tests never collide on unique columns.
pub(crate) fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..12])
}

pub(crate) async fn insert_department(pool: &PgPool, code: &str, name: &str) {
    let insert = sqlx::query(
        r#"
            INSERT INTO departments (code, name)
            VALUES ($1, $2)
            ON CONFLICT (code) DO NOTHING
            "#,
    )
    .bind(code)
    .bind(name)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
}

pub(crate) async fn insert_employee(
    pool: &PgPool,
    full_name: &str,
    department_code: Option<&str>,
    manager_id: Option<Uuid>,
    hire_date: NaiveDate,
    status: &str,
) -> Uuid {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
            INSERT INTO employees (
                employee_number,
                full_name,
                email,
                department_code,
                manager_id,
                hire_date,
                status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
    )
    .bind(unique("E"))
    .bind(full_name)
    .bind(format!("{}@example.com", unique("staff")))
    .bind(department_code)
    .bind(manager_id)
    .bind(hire_date)
    .bind(status)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(id) => id,
        Err(error) => panic!("failed to insert employee fixture: {error}"),
    }
}
