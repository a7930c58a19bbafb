use axum::extract::{Path, State};
use std::sync::Arc;

use crate::database::models::UserMenu;
use crate::dispatch::Dispatcher;
use crate::handlers::path_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserMenus;

/// GET /api/Home/GetUserMenus/:user_id
pub async fn user_menus(
    State(dispatcher): State<Arc<Dispatcher>>,
    user_id: Option<Path<String>>,
) -> ApiResult<Vec<UserMenu>> {
    let user_id = path_id(user_id, "userId")?;
    let menus = dispatcher.send(UserMenus { user_id }).await?;
    Ok(ApiResponse::success(menus))
}
