use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use peoplehub_core::AppError;

use crate::auth::extract_session_token;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session token and attaches the caller to the request.
///
/// Handlers behind this layer can extract `Extension<UserIdentity>` and
/// `Extension<ValidatedSession>`.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = extract_session_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let session = state.auth_service.validate_session(&token).await?;

    request.extensions_mut().insert(session.identity.clone());
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
