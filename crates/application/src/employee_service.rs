//! Employee directory ports and role-scoped read service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use peoplehub_core::{AppError, AppResult, Role, UserIdentity};
use peoplehub_domain::{EmployeeId, EmployeeStatus, can_view_employee};

use crate::require_role;


/// Default page size for employee listings.
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page size accepted for employee listings.
const MAX_PAGE_SIZE: i64 = 200;

/// Employee row joined with department and manager names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    /// Employee identifier.
    pub id: EmployeeId,
    /// Human-facing employee number.
    pub employee_number: String,
    /// Full name.
    pub full_name: String,
    /// Work email.
    pub email: Option<String>,
    /// Department code.
    pub department_code: Option<String>,
    /// Department display name.
    pub department_name: Option<String>,
    /// Job title.
    pub position: Option<String>,
    /// Direct manager.
    pub manager_id: Option<EmployeeId>,
    /// Direct manager's full name.
    pub manager_name: Option<String>,
    /// First working day.
    pub hire_date: NaiveDate,
    /// Employment status.
    pub status: EmployeeStatus,
}

/// Department with its active headcount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSummary {
    /// Department code.
    pub code: String,
    /// Department display name.
    pub name: String,
    /// Number of active employees.
    pub active_headcount: i64,
}

/// Filters and paging for employee listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeQuery {
    /// Restrict to one department code.
    pub department_code: Option<String>,
    /// Restrict to one status.
    pub status: Option<EmployeeStatus>,
    /// Case-insensitive match on name, number or email.
    pub search: Option<String>,
    /// Restrict to a manager and their direct reports.
    pub team_of: Option<EmployeeId>,
    /// Page size.
    pub limit: i64,
    /// Rows to skip.
    pub offset: i64,
}

impl EmployeeQuery {
    /// Returns a copy with blank filters dropped and paging clamped.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.department_code = self
            .department_code
            .map(|code| code.trim().to_owned())
            .filter(|code| !code.is_empty());
        self.search = self
            .search
            .map(|search| search.trim().to_owned())
            .filter(|search| !search.is_empty());
        self.limit = if self.limit <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.limit.min(MAX_PAGE_SIZE)
        };
        self.offset = self.offset.max(0);
        self
    }
}

/// Repository port for employee reads.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Finds one employee.
    async fn find_by_id(&self, employee_id: EmployeeId) -> AppResult<Option<EmployeeRecord>>;

    /// Lists employees matching a normalised query, ordered by full name.
    async fn list(&self, query: &EmployeeQuery) -> AppResult<Vec<EmployeeRecord>>;

    /// Lists the direct reports of a manager, ordered by full name.
    async fn list_direct_reports(&self, manager_id: EmployeeId) -> AppResult<Vec<EmployeeRecord>>;

    /// Lists departments with active headcount, ordered by code.
    async fn list_departments(&self) -> AppResult<Vec<DepartmentSummary>>;
}

/// Application service for the employee directory.
#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    /// Creates a new employee service.
    #[must_use]
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }

    /// Returns the employee record linked to the caller's account.
    pub async fn my_profile(&self, actor: &UserIdentity) -> AppResult<EmployeeRecord> {
        let employee_id = actor.employee_id().map(EmployeeId::from_uuid).ok_or_else(|| {
            AppError::NotFound("no employee record is linked to this account".to_owned())
        })?;

        self.repository
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("employee '{employee_id}' not found")))
    }

    /// Returns one employee if the caller may see it.
    ///
    /// Records outside the caller's visibility are reported as not found.
    pub async fn get_employee(
        &self,
        actor: &UserIdentity,
        employee_id: EmployeeId,
    ) -> AppResult<EmployeeRecord> {
        let not_found = || AppError::NotFound(format!("employee '{employee_id}' not found"));
        let employee = self
            .repository
            .find_by_id(employee_id)
            .await?
            .ok_or_else(not_found)?;

        if !can_view_employee(
            actor.role(),
            actor.employee_id().map(EmployeeId::from_uuid),
            employee.id,
            employee.manager_id,
        ) {
            return Err(not_found());
        }

        Ok(employee)
    }

    /// Lists employees visible to the caller.
    ///
    /// Admins and HR search the whole organisation. Managers only see
    /// themselves and their direct reports.
    pub async fn list_employees(
        &self,
        actor: &UserIdentity,
        query: EmployeeQuery,
    ) -> AppResult<Vec<EmployeeRecord>> {
        require_role(actor, &[Role::Admin, Role::HrManager, Role::Manager])?;

        let mut query = query.normalized();
        if actor.role() == Role::Manager {
            let Some(manager_id) = actor.employee_id().map(EmployeeId::from_uuid) else {
                return Ok(Vec::new());
            };
            query.team_of = Some(manager_id);
        }

        self.repository.list(&query).await
    }

    /// Lists departments with active headcount for admins and HR.
    pub async fn list_departments(&self, actor: &UserIdentity) -> AppResult<Vec<DepartmentSummary>> {
        require_role(actor, &[Role::Admin, Role::HrManager])?;
        self.repository.list_departments().await
    }
}
