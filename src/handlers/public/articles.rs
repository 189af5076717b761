// handlers/public/articles.rs - GET /articles, GET /articles/:id

use axum::extract::{Path, Query, State};

use crate::database::models::Article;
use crate::database::{PageQuery, Pagination};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Paged};
use crate::state::AppState;

/// Published articles only, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paged<Article>> {
    let window = Pagination::from(query);
    let page = state.articles.list_published(window).await?;
    Ok(ApiResponse::success("articles fetched", Paged::new(page, window)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Article> {
    let article = state.articles.get_published(parse_id(&id)?).await?;
    Ok(ApiResponse::success("article fetched", article))
}
