use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::database::{Page, Pagination};

/// Wrapper for API responses that adds the success envelope:
/// `{status: "success", message, data?}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: Option<T>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            status_code: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: Some(StatusCode::CREATED),
            ..Self::success(message, data)
        }
    }
}

impl ApiResponse<()> {
    /// 200 with a message and no `data`
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            status_code: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let mut envelope = json!({
            "status": "success",
            "message": self.message,
        });

        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => envelope["data"] = value,
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "status": "error",
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (status, Json(envelope)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// List payload: `{items, meta: {page, limit, total}}`
#[derive(Debug, Serialize)]
pub struct Paged<T: Serialize> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> Paged<T> {
    pub fn new(page: Page<T>, window: Pagination) -> Self {
        Self {
            items: page.items,
            meta: PageMeta {
                page: window.page,
                limit: window.limit,
                total: page.total,
            },
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn created_carries_envelope() {
        let res = ApiResponse::created("article created", json!({"id": 1})).into_response();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = body(res).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "article created");
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn message_only_omits_data() {
        let res = ApiResponse::message("article deleted").into_response();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body(res).await.get("data").is_none());
    }

    #[test]
    fn paged_nests_meta() {
        let page = Page { items: vec![1, 2], total: 12 };
        let value = serde_json::to_value(Paged::new(page, Pagination::new(2, 2))).unwrap();
        assert_eq!(value, json!({"items": [1, 2], "meta": {"page": 2, "limit": 2, "total": 12}}));
    }
}
