use peoplehub_application::{DepartmentSummary, EmployeeRecord};
use serde::Serialize;
use ts_rs::TS;

/// API representation of an employee.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/employee-response.ts"
)]
pub struct EmployeeResponse {
    pub id: String,
    pub employee_number: String,
    pub full_name: String,
    pub email: Option<String>,
    pub department_code: Option<String>,
    pub department_name: Option<String>,
    pub position: Option<String>,
    pub manager_id: Option<String>,
    pub manager_name: Option<String>,
    pub hire_date: String,
    pub status: String,
}

impl From<EmployeeRecord> for EmployeeResponse {
    fn from(value: EmployeeRecord) -> Self {
        Self {
            id: value.id.to_string(),
            employee_number: value.employee_number,
            full_name: value.full_name,
            email: value.email,
            department_code: value.department_code,
            department_name: value.department_name,
            position: value.position,
            manager_id: value.manager_id.map(|id| id.to_string()),
            manager_name: value.manager_name,
            hire_date: value.hire_date.to_string(),
            status: value.status.as_str().to_owned(),
        }
    }
}

/// API representation of a department.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/department-response.ts"
)]
pub struct DepartmentResponse {
    pub code: String,
    pub name: String,
    pub active_headcount: i64,
}

impl From<DepartmentSummary> for DepartmentResponse {
    fn from(value: DepartmentSummary) -> Self {
        Self {
            code: value.code,
            name: value.name,
            active_headcount: value.active_headcount,
        }
    }
}
