use axum::Json;
use axum::extract::{Extension, State};
use peoplehub_core::UserIdentity;

use crate::dto::DashboardResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/dashboard - Role-specific dashboard widgets for the caller.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<DashboardResponse>> {
    let dashboard = state.dashboard_service.dashboard_for(&user).await?;
    Ok(Json(DashboardResponse::from(dashboard)))
}
