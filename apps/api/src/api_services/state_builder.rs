use std::sync::Arc;

use peoplehub_application::{
    AuthEventService, AuthService, DashboardService, EmployeeService, MenuService,
    UserAdminService,
};
use peoplehub_infrastructure::{
    PostgresAuthEventRepository, PostgresDashboardRepository, PostgresEmployeeRepository,
    PostgresMenuRepository, PostgresSessionRepository, PostgresUserRepository,
    Sha256PasswordHasher,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

struct RepositorySet {
    user_repository: Arc<PostgresUserRepository>,
    session_repository: Arc<PostgresSessionRepository>,
    auth_event_repository: Arc<PostgresAuthEventRepository>,
    employee_repository: Arc<PostgresEmployeeRepository>,
    dashboard_repository: Arc<PostgresDashboardRepository>,
    menu_repository: Arc<PostgresMenuRepository>,
}

fn build_repository_set(pool: &PgPool) -> RepositorySet {
    RepositorySet {
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
        session_repository: Arc::new(PostgresSessionRepository::new(pool.clone())),
        auth_event_repository: Arc::new(PostgresAuthEventRepository::new(pool.clone())),
        employee_repository: Arc::new(PostgresEmployeeRepository::new(pool.clone())),
        dashboard_repository: Arc::new(PostgresDashboardRepository::new(pool.clone())),
        menu_repository: Arc::new(PostgresMenuRepository::new(pool.clone())),
    }
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let repositories = build_repository_set(&pool);
    let password_hasher = Arc::new(Sha256PasswordHasher::new());
    let auth_event_service = AuthEventService::new(repositories.auth_event_repository);

    AppState {
        auth_service: AuthService::new(
            repositories.user_repository.clone(),
            repositories.session_repository.clone(),
            password_hasher.clone(),
            auth_event_service.clone(),
            config.lockout_policy,
            config.session_policy,
        ),
        user_admin_service: UserAdminService::new(
            repositories.user_repository,
            repositories.session_repository,
            password_hasher,
            auth_event_service.clone(),
        ),
        employee_service: EmployeeService::new(repositories.employee_repository.clone()),
        dashboard_service: DashboardService::new(
            repositories.dashboard_repository,
            repositories.employee_repository,
        ),
        menu_service: MenuService::new(repositories.menu_repository, auth_event_service),
        postgres_pool: pool,
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
