use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use peoplehub_application::BootstrapAdminParams;
use peoplehub_core::AppError;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::dto::{BootstrapRequest, LoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::extract_request_context;

/// POST /auth/bootstrap - Create the first administrator using the deployment bootstrap token.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    let context = extract_request_context(&headers);

    let token_matches: bool = payload
        .token
        .as_bytes()
        .ct_eq(state.bootstrap_token.as_bytes())
        .into();
    if !token_matches {
        warn!(ip_address = ?context.ip_address, "bootstrap attempted with invalid token");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let grant = state
        .auth_service
        .bootstrap_admin(
            BootstrapAdminParams {
                username: payload.username,
                display_name: payload.display_name,
                password: payload.password,
            },
            context,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(LoginResponse::from(grant))))
}
