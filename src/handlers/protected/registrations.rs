// handlers/protected/registrations.rs - GET/DELETE /admin/registrations[/:id]

use axum::extract::{Path, Query, State};

use crate::database::models::Registration;
use crate::database::{PageQuery, Pagination};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Paged};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paged<Registration>> {
    let window = Pagination::from(query);
    let page = state.registrations.list(window).await?;
    Ok(ApiResponse::success("registrations fetched", Paged::new(page, window)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Registration> {
    let registration = state.registrations.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success("registration fetched", registration))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.registrations.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::<()>::message("registration deleted"))
}
