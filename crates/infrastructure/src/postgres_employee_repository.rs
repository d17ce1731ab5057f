//! PostgreSQL-backed employee directory.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use peoplehub_application::{DepartmentSummary, EmployeeQuery, EmployeeRecord, EmployeeRepository};
use peoplehub_core::{AppError, AppResult};
use peoplehub_domain::{EmployeeId, EmployeeStatus};


/// PostgreSQL implementation of the employee repository port.
#[derive(Clone)]
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EmployeeRow {
    id: uuid::Uuid,
    employee_number: String,
    full_name: String,
    email: Option<String>,
    department_code: Option<String>,
    department_name: Option<String>,
    position: Option<String>,
    manager_id: Option<uuid::Uuid>,
    manager_name: Option<String>,
    hire_date: NaiveDate,
    status: String,
}

impl TryFrom<EmployeeRow> for EmployeeRecord {
    type Error = AppError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmployeeId::from_uuid(row.id),
            employee_number: row.employee_number,
            full_name: row.full_name,
            email: row.email,
            department_code: row.department_code,
            department_name: row.department_name,
            position: row.position,
            manager_id: row.manager_id.map(EmployeeId::from_uuid),
            manager_name: row.manager_name,
            hire_date: row.hire_date,
            status: EmployeeStatus::parse(&row.status)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DepartmentRow {
    code: String,
    name: String,
    active_headcount: i64,
}

impl From<DepartmentRow> for DepartmentSummary {
    fn from(row: DepartmentRow) -> Self {
        Self {
            code: row.code,
            name: row.name,
            active_headcount: row.active_headcount,
        }
    }
}

/// Employee projection joined with department and manager names.
pub(crate) const EMPLOYEE_SELECT: &str = r#"
    SELECT e.id, e.employee_number, e.full_name, e.email,
           e.department_code, d.name AS department_name, e.position,
           e.manager_id, m.full_name AS manager_name, e.hire_date, e.status
    FROM employees e
    LEFT JOIN departments d ON d.code = e.department_code
    LEFT JOIN employees m ON m.id = e.manager_id
"#;

/// Departments with their active headcount.
pub(crate) const DEPARTMENT_SELECT: &str = r#"
    SELECT d.code, d.name,
           COUNT(e.id) FILTER (WHERE e.status = 'active') AS active_headcount
    FROM departments d
    LEFT JOIN employees e ON e.department_code = d.code
    GROUP BY d.code, d.name
    ORDER BY d.code
"#;

pub(crate) fn into_records(rows: Vec<EmployeeRow>) -> AppResult<Vec<EmployeeRecord>> {
    rows.into_iter().map(EmployeeRecord::try_from).collect()
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn find_by_id(&self, employee_id: EmployeeId) -> AppResult<Option<EmployeeRecord>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!("{EMPLOYEE_SELECT} WHERE e.id = $1"))
            .bind(employee_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find employee: {error}")))?;

        row.map(EmployeeRecord::try_from).transpose()
    }

    async fn list(&self, query: &EmployeeQuery) -> AppResult<Vec<EmployeeRecord>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            r#"
            {EMPLOYEE_SELECT}
            WHERE ($1::text IS NULL OR e.department_code = $1)
              AND ($2::text IS NULL OR e.status = $2)
              AND ($3::uuid IS NULL OR e.id = $3 OR e.manager_id = $3)
              AND (
                  $4::text IS NULL
                  OR e.full_name ILIKE '%' || $4 || '%'
                  OR e.employee_number ILIKE '%' || $4 || '%'
                  OR e.email ILIKE '%' || $4 || '%'
              )
            ORDER BY e.full_name, e.employee_number
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(query.department_code.as_deref())
        .bind(query.status.map(|status| status.as_str()))
        .bind(query.team_of.map(|manager_id| manager_id.as_uuid()))
        .bind(query.search.as_deref().map(escape_like))
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list employees: {error}")))?;

        into_records(rows)
    }

    async fn list_direct_reports(&self, manager_id: EmployeeId) -> AppResult<Vec<EmployeeRecord>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{EMPLOYEE_SELECT} WHERE e.manager_id = $1 ORDER BY e.full_name"
        ))
        .bind(manager_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list direct reports: {error}")))?;

        into_records(rows)
    }

    async fn list_departments(&self) -> AppResult<Vec<DepartmentSummary>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(DEPARTMENT_SELECT)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list departments: {error}")))?;

        Ok(rows.into_iter().map(DepartmentSummary::from).collect())
    }
}

/// Escapes LIKE wildcards so search input matches literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
