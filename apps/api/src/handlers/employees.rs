use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use peoplehub_application::EmployeeQuery;
use peoplehub_core::UserIdentity;
use peoplehub_domain::{EmployeeId, EmployeeStatus};
use serde::Deserialize;
use uuid::Uuid;

use crate::dto::{DepartmentResponse, EmployeeResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmployeeListQuery {
    pub department: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EmployeeListQuery {
    fn into_query(self) -> ApiResult<EmployeeQuery> {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(EmployeeStatus::parse)
            .transpose()?;

        Ok(EmployeeQuery {
            department_code: self.department,
            status,
            search: self.search,
            team_of: None,
            limit: self.limit.unwrap_or(50),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// GET /api/employees - Employees visible to the caller, optionally filtered.
pub async fn list_employees_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<EmployeeListQuery>,
) -> ApiResult<Json<Vec<EmployeeResponse>>> {
    let employees = state
        .employee_service
        .list_employees(&user, query.into_query()?)
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(employees))
}

/// GET /api/employees/me - The caller's own employee record.
pub async fn my_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state.employee_service.my_profile(&user).await?;
    Ok(Json(EmployeeResponse::from(employee)))
}

/// GET /api/employees/{id} - One employee if visible to the caller.
pub async fn get_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(employee_id): Path<Uuid>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state
        .employee_service
        .get_employee(&user, EmployeeId::from_uuid(employee_id))
        .await?;
    Ok(Json(EmployeeResponse::from(employee)))
}

/// GET /api/departments - Departments with active headcount.
pub async fn list_departments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .employee_service
        .list_departments(&user)
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

#[cfg(test)]
mod tests {
    use peoplehub_domain::EmployeeStatus;

    use super::EmployeeListQuery;

    fn query(status: Option<&str>) -> EmployeeListQuery {
        EmployeeListQuery {
            department: Some("ENG".to_owned()),
            status: status.map(ToOwned::to_owned),
            search: None,
            limit: None,
            offset: Some(20),
        }
    }

    #[test]
    fn list_query_applies_defaults_and_parses_status() {
        let parsed = query(Some("on_leave"))
            .into_query()
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(parsed.status, Some(EmployeeStatus::OnLeave));
        assert_eq!(parsed.department_code.as_deref(), Some("ENG"));
        assert_eq!(parsed.limit, 50);
        assert_eq!(parsed.offset, 20);
        assert!(parsed.team_of.is_none());
    }

    #[test]
    fn list_query_rejects_unknown_status() {
        assert!(query(Some("retired")).into_query().is_err());
        assert!(
            query(Some(" "))
                .into_query()
                .is_ok_and(|parsed| parsed.status.is_none())
        );
    }
}
