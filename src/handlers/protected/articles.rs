// handlers/protected/articles.rs - Article management for the admin console
//
// GET    /admin/articles        every article, drafts included
// POST   /admin/articles        multipart create
// PUT    /admin/articles/:id    multipart update
// DELETE /admin/articles/:id
// GET    /admin/articles/media  signed read URL for an uploaded object

use axum::extract::{multipart::MultipartRejection, Multipart, Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::database::models::Article;
use crate::database::{PageQuery, Pagination};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Paged};
use crate::state::AppState;
use crate::upload::ArticleForm;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paged<Article>> {
    let window = Pagination::from(query);
    let page = state.articles.list_all(window).await?;
    Ok(ApiResponse::success("articles fetched", Paged::new(page, window)))
}

/**
 * POST /admin/articles - Create an article from a multipart form
 *
 * Text fields: `title`, `author`, `content` (editor JSON), `status`
 * (draft | published, default draft) and `photo_header` (URL).
 *
 * File fields: `photo_header_file` replaces `photo_header`; any other file
 * field named `content_files[<key>]` or `content_file_<key>` is stored and its
 * URL injected into the content blocks that reference the key.
 */
pub async fn create(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Article> {
    let form = ArticleForm::read(multipart?).await?;
    let article = state.articles.create(form).await?;
    Ok(ApiResponse::created("article created", article))
}

/// Same form as create; a missing `status` keeps the stored one.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Article> {
    let id = parse_id(&id)?;
    let form = ArticleForm::read(multipart?).await?;
    let article = state.articles.update(id, form).await?;
    Ok(ApiResponse::success("article updated", article))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.articles.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::<()>::message("article deleted"))
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    #[serde(default)]
    pub object: String,
}

#[derive(Debug, Serialize)]
pub struct MediaUrl {
    pub object: String,
    pub url: String,
    pub expires_in: u64,
}

pub async fn media(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> ApiResult<MediaUrl> {
    let url = state.articles.media_url(&query.object).await?;
    Ok(ApiResponse::success(
        "media url generated",
        MediaUrl {
            object: query.object.trim().to_string(),
            url,
            expires_in: crate::services::MEDIA_URL_TTL.as_secs(),
        },
    ))
}
