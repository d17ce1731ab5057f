use std::collections::BTreeSet;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use peoplehub_application::CreateUserParams;
use peoplehub_core::{AppError, Role, UserIdentity};
use peoplehub_domain::{EmployeeId, UserId};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extract_request_context;
use crate::dto::{
    AuthEventResponse, CreateUserRequest, MenuAccessItemResponse, UpdateMenuRolesRequest,
    UpdateUserActiveRequest, UpdateUserRoleRequest, UserAccountResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_AUTH_EVENT_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct AuthEventQuery {
    pub limit: Option<i64>,
}

fn parse_employee_id(value: Option<&str>) -> Result<Option<EmployeeId>, AppError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            Uuid::parse_str(value)
                .map(EmployeeId::from_uuid)
                .map_err(|_| AppError::Validation(format!("invalid employee id '{value}'")))
        })
        .transpose()
}

fn parse_roles(values: &[String]) -> Result<BTreeSet<Role>, AppError> {
    values.iter().map(|value| value.trim().parse()).collect()
}

/// GET /api/admin/users - All user accounts.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserAccountResponse>>> {
    let users = state
        .user_admin_service
        .list_users(&user)
        .await?
        .into_iter()
        .map(UserAccountResponse::from)
        .collect();

    Ok(Json(users))
}

/// POST /api/admin/users - Create an account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserAccountResponse>)> {
    let params = CreateUserParams {
        employee_id: parse_employee_id(payload.employee_id.as_deref())?,
        role: payload.role.trim().parse()?,
        username: payload.username,
        display_name: payload.display_name,
        password: payload.password,
    };

    let created = state
        .user_admin_service
        .create_user(&user, params, extract_request_context(&headers))
        .await?;

    Ok((StatusCode::CREATED, Json(UserAccountResponse::from(created))))
}

/// PUT /api/admin/users/{id}/role - Change an account's role.
pub async fn update_user_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> ApiResult<Json<UserAccountResponse>> {
    let updated = state
        .user_admin_service
        .update_user_role(
            &user,
            UserId::from_uuid(user_id),
            payload.role.trim().parse()?,
            extract_request_context(&headers),
        )
        .await?;

    Ok(Json(UserAccountResponse::from(updated)))
}

/// PUT /api/admin/users/{id}/active - Activate or deactivate an account.
pub async fn update_user_active_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<UpdateUserActiveRequest>,
) -> ApiResult<Json<UserAccountResponse>> {
    let updated = state
        .user_admin_service
        .set_user_active(
            &user,
            UserId::from_uuid(user_id),
            payload.is_active,
            extract_request_context(&headers),
        )
        .await?;

    Ok(Json(UserAccountResponse::from(updated)))
}

/// POST /api/admin/users/{id}/unlock - Clear a lockout.
pub async fn unlock_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
) -> ApiResult<Json<UserAccountResponse>> {
    let updated = state
        .user_admin_service
        .unlock_user(
            &user,
            UserId::from_uuid(user_id),
            extract_request_context(&headers),
        )
        .await?;

    Ok(Json(UserAccountResponse::from(updated)))
}

/// GET /api/admin/menus - Every menu item with its role grants.
pub async fn list_menu_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<MenuAccessItemResponse>>> {
    let items = state
        .menu_service
        .list_menu_access(&user)
        .await?
        .into_iter()
        .map(MenuAccessItemResponse::from)
        .collect();

    Ok(Json(items))
}

/// PUT /api/admin/menus/{code}/roles - Replace the roles granted to a menu item.
pub async fn update_menu_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateMenuRolesRequest>,
) -> ApiResult<Json<MenuAccessItemResponse>> {
    let item = state
        .menu_service
        .set_menu_roles(
            &user,
            &code,
            parse_roles(&payload.roles)?,
            extract_request_context(&headers),
        )
        .await?;

    Ok(Json(MenuAccessItemResponse::from(item)))
}

/// GET /api/admin/auth-events - Newest authentication events.
pub async fn list_auth_events_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<AuthEventQuery>,
) -> ApiResult<Json<Vec<AuthEventResponse>>> {
    let events = state
        .user_admin_service
        .list_auth_events(&user, query.limit.unwrap_or(DEFAULT_AUTH_EVENT_LIMIT))
        .await?
        .into_iter()
        .map(AuthEventResponse::from)
        .collect();

    Ok(Json(events))
}
