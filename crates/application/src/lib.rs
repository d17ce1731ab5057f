//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_event_service;
mod auth_service;
mod dashboard_service;
mod employee_service;
mod menu_service;
mod user_admin_service;

#[cfg(test)]
mod test_support;

pub use auth_event_service::{AuthEvent, AuthEventEntry, AuthEventRepository, AuthEventService};
pub use auth_service::{
    AuthOutcome, AuthService, BootstrapAdminParams, ClientContext, NewSession, NewUser,
    PasswordHasher, SessionGrant, SessionRecord, SessionRepository, UserRecord, UserRepository,
    ValidatedSession,
};
pub use dashboard_service::{
    Dashboard, DashboardRepository, DashboardService, DashboardWidget, DashboardWidgetContent,
    HeadcountSummary, SecuritySummary,
};
pub use employee_service::{
    DepartmentSummary, EmployeeQuery, EmployeeRecord, EmployeeRepository, EmployeeService,
};
pub use menu_service::{MenuRepository, MenuService};
pub use user_admin_service::{CreateUserParams, UserAdminService};

use peoplehub_core::{AppError, AppResult, Role, UserIdentity};

/// Ensures the caller holds one of the allowed roles.
pub(crate) fn require_role(actor: &UserIdentity, allowed: &[Role]) -> AppResult<()> {
    if allowed.contains(&actor.role()) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "role '{}' is not allowed to perform this operation",
        actor.role()
    )))
}
