// handlers/public/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Darul Abror API",
        "data": {
            "name": "Darul Abror API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "public": "/auth/login, /articles[/:id], /registrations, /contacts",
                "admin": "/admin/profile, /admin/articles, /admin/registrations, /admin/contacts (admin | superadmin)",
                "superadmin": "/admin/admins (superadmin)",
            }
        }
    }))
}

/// 200 when the database answers, 503 otherwise. In-memory deployments report
/// `database: "memory"`.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(db) = &state.db else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "ok",
                "data": { "status": "ok", "timestamp": now, "database": "memory" }
            })),
        );
    };

    match db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "ok",
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now, "database": "unavailable" }
                })),
            )
        }
    }
}
