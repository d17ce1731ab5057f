//! Transport types shared with the frontend through generated TypeScript bindings.

mod admin;
mod auth;
mod dashboard;
mod employees;
mod menus;

pub use admin::{
    AuthEventResponse, CreateUserRequest, UpdateMenuRolesRequest, UpdateUserActiveRequest,
    UpdateUserRoleRequest, UserAccountResponse,
};
pub use auth::{
    BootstrapRequest, ChangePasswordRequest, LoginRequest, LoginResponse, SessionResponse,
};
pub use dashboard::DashboardResponse;
pub use employees::{DepartmentResponse, EmployeeResponse};
pub use menus::{MenuAccessItemResponse, MenuAccessResponse, MenuNodeResponse};

use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

fn timestamp(value: chrono::DateTime<chrono::Utc>) -> String {
    value.to_rfc3339()
}
