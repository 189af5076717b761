// handlers/protected/profile.rs - GET /admin/profile

use axum::extract::State;

use crate::database::models::Admin;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Principal;

/// The caller's own admin record, looked up by the token's `admin_id`
pub async fn show(State(state): State<AppState>, principal: Principal) -> ApiResult<Admin> {
    let admin = state.admins.profile(principal.identity).await?;
    Ok(ApiResponse::success("profile fetched", admin))
}
