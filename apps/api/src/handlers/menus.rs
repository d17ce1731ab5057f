use axum::Json;
use axum::extract::{Extension, Path, State};
use peoplehub_core::UserIdentity;

use crate::dto::{MenuAccessResponse, MenuNodeResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/menus - Navigation tree visible to the caller's role.
pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<MenuNodeResponse>>> {
    let nodes = state
        .menu_service
        .navigation_for(&user)
        .await?
        .into_iter()
        .map(MenuNodeResponse::from)
        .collect();

    Ok(Json(nodes))
}

/// GET /api/menus/{code}/access - Whether the caller may open a menu item.
pub async fn menu_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(code): Path<String>,
) -> ApiResult<Json<MenuAccessResponse>> {
    let allowed = state.menu_service.check_access(&user, &code).await?;
    Ok(Json(MenuAccessResponse { code, allowed }))
}
