//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod postgres_auth_event_repository;
mod postgres_dashboard_repository;
mod postgres_employee_repository;
mod postgres_menu_repository;
mod postgres_session_repository;
mod postgres_user_repository;
mod sha256_password_hasher;

#[cfg(test)]
mod test_database;

pub use postgres_auth_event_repository::PostgresAuthEventRepository;
pub use postgres_dashboard_repository::PostgresDashboardRepository;
pub use postgres_employee_repository::PostgresEmployeeRepository;
pub use postgres_menu_repository::PostgresMenuRepository;
pub use postgres_session_repository::PostgresSessionRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use sha256_password_hasher::Sha256PasswordHasher;
