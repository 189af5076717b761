// handlers/public/contacts.rs - POST /contacts

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::Contact;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ContactInput;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> ApiResult<Contact> {
    let Json(input) = payload?;
    let contact = state.contacts.create(input).await?;
    Ok(ApiResponse::created("contact submitted", contact))
}
