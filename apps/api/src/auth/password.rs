use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use peoplehub_core::UserIdentity;

use crate::dto::ChangePasswordRequest;
use crate::error::ApiResult;
use crate::state::AppState;

use super::extract_request_context;

/// PUT /api/profile/password - Change the caller's password and revoke their other sessions.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth_service
        .change_password(
            &user,
            &payload.current_password,
            &payload.new_password,
            extract_request_context(&headers),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
