// handlers/protected/contacts.rs - Contact message management

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};

use crate::database::models::Contact;
use crate::database::{PageQuery, Pagination};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Paged};
use crate::services::ContactInput;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paged<Contact>> {
    let window = Pagination::from(query);
    let page = state.contacts.list(window).await?;
    Ok(ApiResponse::success("contacts fetched", Paged::new(page, window)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Contact> {
    let contact = state.contacts.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success("contact fetched", contact))
}

/// Replaces email, subject and message; all three are revalidated.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> ApiResult<Contact> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let contact = state.contacts.update(id, input).await?;
    Ok(ApiResponse::success("contact updated", contact))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.contacts.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::<()>::message("contact deleted"))
}
