// handlers/public/auth.rs - POST /auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Validator;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginAdmin {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub admin: LoginAdmin,
}

/**
 * POST /auth/login - Authenticate an administrator and receive a JWT
 *
 * Expected Input:
 * ```json
 * { "email": "admin@darulabror.sch.id", "password": "..." }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "status": "success",
 *   "message": "login successful",
 *   "data": {
 *     "token": "eyJhbGciOiJIUzI1NiI...",
 *     "token_type": "Bearer",
 *     "expires_in": 86400,
 *     "admin": { "id": 1, "username": "admin", "email": "...", "role": "superadmin" }
 *   }
 * }
 * ```
 *
 * Wrong email or password → 401 "invalid credentials"; inactive account → 403.
 */
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(body) = payload?;

    let mut v = Validator::new();
    v.required("email", &body.email);
    v.required("password", &body.password);
    v.finish()
        .map_err(|fields| ApiError::unprocessable_entity("validation failed", fields))?;

    let login = state.credentials.authenticate(&body.email, &body.password).await?;

    Ok(ApiResponse::success(
        "login successful",
        LoginResponse {
            token: login.token.token,
            token_type: "Bearer",
            expires_in: login.token.expires_in,
            admin: LoginAdmin {
                id: login.admin.id,
                username: login.admin.username,
                email: login.admin.email,
                role: login.principal.role.as_str().to_string(),
            },
        },
    ))
}
