use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use peoplehub_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/session", get(auth::session_handler))
        .route("/api/profile/password", put(auth::change_password_handler))
        .route("/api/dashboard", get(handlers::dashboard::dashboard_handler))
        .route("/api/menus", get(handlers::menus::navigation_handler))
        .route(
            "/api/menus/{code}/access",
            get(handlers::menus::menu_access_handler),
        )
        .route(
            "/api/employees",
            get(handlers::employees::list_employees_handler),
        )
        .route(
            "/api/employees/me",
            get(handlers::employees::my_profile_handler),
        )
        .route(
            "/api/employees/{employee_id}",
            get(handlers::employees::get_employee_handler),
        )
        .route(
            "/api/departments",
            get(handlers::employees::list_departments_handler),
        )
        .route(
            "/api/admin/users",
            get(handlers::admin::list_users_handler).post(handlers::admin::create_user_handler),
        )
        .route(
            "/api/admin/users/{user_id}/role",
            put(handlers::admin::update_user_role_handler),
        )
        .route(
            "/api/admin/users/{user_id}/active",
            put(handlers::admin::update_user_active_handler),
        )
        .route(
            "/api/admin/users/{user_id}/unlock",
            post(handlers::admin::unlock_user_handler),
        )
        .route(
            "/api/admin/menus",
            get(handlers::admin::list_menu_access_handler),
        )
        .route(
            "/api/admin/menus/{code}/roles",
            put(handlers::admin::update_menu_roles_handler),
        )
        .route(
            "/api/admin/auth-events",
            get(handlers::admin::list_auth_events_handler),
        )
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_session,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http()))
}
