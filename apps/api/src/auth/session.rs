use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use peoplehub_application::{AuthOutcome, ValidatedSession};
use peoplehub_core::AppError;

use crate::dto::{LoginRequest, LoginResponse, SessionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{extract_request_context, extract_session_token};

/// POST /auth/login - Authenticate with username and password and issue a session token.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let context = extract_request_context(&headers);

    match state
        .auth_service
        .login(&payload.username, &payload.password, context)
        .await?
    {
        AuthOutcome::Authenticated(grant) => Ok(Json(LoginResponse::from(grant))),
        AuthOutcome::Failed => {
            Err(AppError::Unauthorized("invalid username or password".to_owned()).into())
        }
    }
}

/// POST /auth/logout - Revoke the presented session token.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    if let Some(token) = extract_session_token(&headers) {
        state
            .auth_service
            .logout(&token, extract_request_context(&headers))
            .await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/session - Return the caller identity and current expiry.
pub async fn session_handler(
    Extension(session): Extension<ValidatedSession>,
) -> Json<SessionResponse> {
    Json(SessionResponse::from(&session))
}
