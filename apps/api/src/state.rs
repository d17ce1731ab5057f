use peoplehub_application::{
    AuthService, DashboardService, EmployeeService, MenuService, UserAdminService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_admin_service: UserAdminService,
    pub employee_service: EmployeeService,
    pub dashboard_service: DashboardService,
    pub menu_service: MenuService,
    pub postgres_pool: PgPool,
    pub bootstrap_token: String,
}
