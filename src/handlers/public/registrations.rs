// handlers/public/registrations.rs - POST /registrations

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::Registration;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RegistrationInput;
use crate::state::AppState;

/// Admission form submission. Email and NISN must be unused (409 otherwise).
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationInput>, JsonRejection>,
) -> ApiResult<Registration> {
    let Json(input) = payload?;
    let registration = state.registrations.create(input).await?;
    Ok(ApiResponse::created("registration submitted", registration))
}
