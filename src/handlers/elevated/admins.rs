// handlers/elevated/admins.rs - /admin/admins CRUD

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};

use crate::database::models::Admin;
use crate::database::{PageQuery, Pagination};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Paged};
use crate::services::AdminInput;
use crate::state::AppState;
use crate::types::Principal;

/**
 * POST /admin/admins - Create an administrator account
 *
 * Expected Input:
 * ```json
 * {
 *   "username": "operator",
 *   "email": "operator@darulabror.sch.id",
 *   "password": "at-least-8-chars",
 *   "role": "admin",
 *   "is_active": true
 * }
 * ```
 *
 * The password is stored as a bcrypt hash and never returned. A taken email
 * yields 409.
 */
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<AdminInput>, JsonRejection>,
) -> ApiResult<Admin> {
    let Json(input) = payload?;
    let admin = state.admins.create(&principal, input).await?;
    Ok(ApiResponse::created("admin created", admin))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paged<Admin>> {
    let window = Pagination::from(query);
    let page = state.admins.list(window).await?;
    Ok(ApiResponse::success("admins fetched", Paged::new(page, window)))
}

/// A blank password leaves the stored hash untouched.
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    payload: Result<Json<AdminInput>, JsonRejection>,
) -> ApiResult<Admin> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let admin = state.admins.update(&principal, id, input).await?;
    Ok(ApiResponse::success("admin updated", admin))
}

pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.admins.delete(&principal, parse_id(&id)?).await?;
    Ok(ApiResponse::<()>::message("admin deleted"))
}
