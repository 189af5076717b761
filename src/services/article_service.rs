use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::{missing, ServiceError};
use crate::content::inject_uploaded_urls;
use crate::database::models::{Article, ArticleStatus, NewArticle};
use crate::database::{ArticleRepository, Page, Pagination};
use crate::upload::{ArticleForm, MediaUploader};
use crate::validation::Validator;

/// Lifetime of URLs handed out by `media_url`
pub const MEDIA_URL_TTL: Duration = Duration::from_secs(10 * 60);

/// Text fields of an article form, checked before any file is uploaded.
#[derive(Debug, Clone)]
pub struct ArticleFields {
    pub title: String,
    pub author: String,
    pub status: Option<ArticleStatus>,
    pub content: Value,
    /// Header URL given as text; a `photo_header_file` upload replaces it
    pub photo_header: Option<String>,
}

impl ArticleFields {
    pub fn from_form(form: &ArticleForm) -> Result<Self, ServiceError> {
        let (title, author, raw_content) = match (
            form.trimmed("title"),
            form.trimmed("author"),
            form.trimmed("content"),
        ) {
            (Some(t), Some(a), Some(c)) => (t, a, c),
            _ => {
                return Err(ServiceError::BadRequest(
                    "missing required fields: title, author, content".into(),
                ))
            }
        };

        let content: Value = serde_json::from_str(raw_content)
            .map_err(|_| ServiceError::BadRequest("content must be valid JSON".into()))?;

        let photo_header = form.trimmed("photo_header").map(str::to_string);
        if photo_header.is_none() && form.header_file.is_none() {
            return Err(ServiceError::BadRequest(
                "photo_header is required (provide photo_header URL or upload photo_header_file)"
                    .into(),
            ));
        }

        let mut v = Validator::new();
        v.length("title", title, 3, 100);
        v.length("author", author, 3, 50);
        let status = form.trimmed("status");
        if let Some(status) = status {
            v.one_of("status", status, &["draft", "published"]);
        }
        v.finish()?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            status: status.and_then(ArticleStatus::parse),
            content,
            photo_header,
        })
    }
}

#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    uploader: MediaUploader,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>, uploader: MediaUploader) -> Self {
        Self { repo, uploader }
    }

    pub async fn list_published(&self, page: Pagination) -> Result<Page<Article>, ServiceError> {
        Ok(self.repo.list_published(page).await?)
    }

    /// Drafts are indistinguishable from missing articles here
    pub async fn get_published(&self, id: i64) -> Result<Article, ServiceError> {
        match self.repo.find_by_id(id).await? {
            Some(article) if article.is_published() => Ok(article),
            _ => Err(ServiceError::NotFound("article")),
        }
    }

    pub async fn list_all(&self, page: Pagination) -> Result<Page<Article>, ServiceError> {
        Ok(self.repo.list_all(page).await?)
    }

    pub async fn create(&self, form: ArticleForm) -> Result<Article, ServiceError> {
        let fields = ArticleFields::from_form(&form)?;
        let (content, photo_header) = self.resolve_media(&form, fields.content, fields.photo_header).await?;

        let article = self
            .repo
            .create(NewArticle {
                title: fields.title,
                content,
                author: fields.author,
                status: fields.status.unwrap_or(ArticleStatus::Draft),
                photo_header,
            })
            .await?;

        tracing::info!(article_id = article.id, title = %article.title, "article created");
        Ok(article)
    }

    /// Replaces title, author, content and header; status only when given.
    pub async fn update(&self, id: i64, form: ArticleForm) -> Result<Article, ServiceError> {
        let fields = ArticleFields::from_form(&form)?;
        let mut article = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("article"))?;

        let (content, photo_header) = self.resolve_media(&form, fields.content, fields.photo_header).await?;

        article.title = fields.title;
        article.author = fields.author;
        article.content = content;
        article.photo_header = photo_header;
        if let Some(status) = fields.status {
            article.status = status.as_str().to_string();
        }

        let article = self.repo.update(&article).await.map_err(missing("article"))?;
        tracing::info!(article_id = id, "article updated");
        Ok(article)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.repo.delete(id).await.map_err(missing("article"))?;
        tracing::info!(article_id = id, "article deleted");
        Ok(())
    }

    /// Time-limited read URL for an uploaded object
    pub async fn media_url(&self, object_name: &str) -> Result<String, ServiceError> {
        let object_name = object_name.trim();
        if object_name.is_empty() {
            return Err(ServiceError::BadRequest("object is required".into()));
        }
        Ok(self.uploader.store().signed_url(object_name, MEDIA_URL_TTL).await?)
    }

    /// Uploads content files, rewrites placeholders and settles the header URL.
    async fn resolve_media(
        &self,
        form: &ArticleForm,
        content: Value,
        photo_header: Option<String>,
    ) -> Result<(Value, String), ServiceError> {
        let mapping = self.uploader.upload_content(&form.content_files).await?;
        let content = inject_uploaded_urls(content, &mapping);

        let photo_header = match (&form.header_file, photo_header) {
            (Some(file), _) => self.uploader.upload_header(file).await?,
            (None, Some(url)) => url,
            // from_form guarantees one of the two
            (None, None) => {
                return Err(ServiceError::BadRequest("photo_header is required".into()))
            }
        };
        Ok((content, photo_header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{article_form, MemoryArticleRepository, MemoryStore};
    use crate::upload::{ContentFile, PendingFile, UploadError};
    use axum::body::Bytes;
    use serde_json::json;

    fn service(store: MemoryStore) -> (ArticleService, Arc<MemoryStore>) {
        let store = Arc::new(store);
        let svc = ArticleService::new(
            Arc::new(MemoryArticleRepository::default()),
            MediaUploader::new(store.clone()),
        );
        (svc, store)
    }

    fn png(name: &str) -> PendingFile {
        PendingFile {
            file_name: name.to_string(),
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[tokio::test]
    async fn create_defaults_to_draft_and_injects_urls() {
        let (svc, _) = service(MemoryStore::configured("https://cdn.test"));
        let mut form = article_form(&[
            ("title", "School news"),
            ("author", "Editor"),
            ("photo_header", "https://cdn.test/h.png"),
            ("content", r#"{"blocks":[{"type":"image","data":{"file":{"fileKey":"img1"}}}]}"#),
        ]);
        form.content_files.push(ContentFile { key: "img1".into(), file: png("a.png") });

        let article = svc.create(form).await.unwrap();
        assert_eq!(article.status, "draft");
        let url = article.content["blocks"][0]["data"]["file"]["url"].as_str().unwrap();
        assert!(url.starts_with("https://cdn.test/articles/content/img1_"));
        assert_eq!(article.photo_header, "https://cdn.test/h.png");
    }

    #[tokio::test]
    async fn header_file_overrides_header_text() {
        let (svc, _) = service(MemoryStore::configured("https://cdn.test"));
        let mut form = article_form(&[
            ("title", "School news"),
            ("author", "Editor"),
            ("photo_header", "https://elsewhere/h.png"),
            ("content", "{}"),
        ]);
        form.header_file = Some(png("header.png"));

        let article = svc.create(form).await.unwrap();
        assert!(article.photo_header.starts_with("https://cdn.test/articles/header_"));
    }

    #[tokio::test]
    async fn rejects_bad_fields_before_uploading() {
        let (svc, store) = service(MemoryStore::configured("https://cdn.test"));
        let mut form = article_form(&[
            ("title", "No"),
            ("author", "Editor"),
            ("status", "archived"),
            ("photo_header", "https://cdn.test/h.png"),
            ("content", "{}"),
        ]);
        form.content_files.push(ContentFile { key: "img1".into(), file: png("a.png") });

        match svc.create(form).await {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.contains_key("title"));
                assert!(errors.contains_key("status"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|a| a.id)),
        }
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn invalid_content_and_missing_header_are_bad_requests() {
        let (svc, _) = service(MemoryStore::configured("https://cdn.test"));
        let bad_json = article_form(&[
            ("title", "School news"),
            ("author", "Editor"),
            ("photo_header", "x"),
            ("content", "{not json"),
        ]);
        assert!(matches!(svc.create(bad_json).await, Err(ServiceError::BadRequest(_))));

        let no_header = article_form(&[("title", "School news"), ("author", "Editor"), ("content", "[]")]);
        assert!(matches!(svc.create(no_header).await, Err(ServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn unconfigured_storage_fails_uploads_only() {
        let (svc, _) = service(MemoryStore::unconfigured());
        let plain = article_form(&[
            ("title", "School news"),
            ("author", "Editor"),
            ("photo_header", "https://cdn.test/h.png"),
            ("content", "{}"),
        ]);
        assert!(svc.create(plain).await.is_ok());

        let mut with_file = article_form(&[
            ("title", "School news"),
            ("author", "Editor"),
            ("photo_header", "https://cdn.test/h.png"),
            ("content", "{}"),
        ]);
        with_file.content_files.push(ContentFile { key: "img1".into(), file: png("a.png") });
        assert!(matches!(
            svc.create(with_file).await,
            Err(ServiceError::Upload(UploadError::StorageNotConfigured))
        ));
    }

    #[tokio::test]
    async fn update_keeps_status_unless_given() {
        let (svc, _) = service(MemoryStore::configured("https://cdn.test"));
        let created = svc
            .create(article_form(&[
                ("title", "School news"),
                ("author", "Editor"),
                ("status", "published"),
                ("photo_header", "https://cdn.test/h.png"),
                ("content", "{}"),
            ]))
            .await
            .unwrap();

        let updated = svc
            .update(
                created.id,
                article_form(&[
                    ("title", "School news, revised"),
                    ("author", "Editor"),
                    ("photo_header", "https://cdn.test/h2.png"),
                    ("content", r#"{"v":2}"#),
                ]),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "published");
        assert_eq!(updated.title, "School news, revised");
        assert_eq!(updated.content, json!({"v": 2}));
        assert_eq!(updated.photo_header, "https://cdn.test/h2.png");

        let missing = svc
            .update(
                999,
                article_form(&[("title", "Nope"), ("author", "Editor"), ("photo_header", "x"), ("content", "{}")]),
            )
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound("article"))));
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_public_reads() {
        let (svc, _) = service(MemoryStore::configured("https://cdn.test"));
        let draft = svc
            .create(article_form(&[
                ("title", "Draft piece"),
                ("author", "Editor"),
                ("photo_header", "h"),
                ("content", "{}"),
            ]))
            .await
            .unwrap();
        assert!(matches!(svc.get_published(draft.id).await, Err(ServiceError::NotFound(_))));
        assert_eq!(svc.list_published(Pagination::default()).await.unwrap().total, 0);
        assert_eq!(svc.list_all(Pagination::default()).await.unwrap().total, 1);

        svc.delete(draft.id).await.unwrap();
        assert!(matches!(svc.delete(draft.id).await, Err(ServiceError::NotFound("article"))));
    }

    #[tokio::test]
    async fn media_url_needs_an_object_name() {
        let (svc, _) = service(MemoryStore::configured("https://cdn.test"));
        assert!(matches!(svc.media_url("  ").await, Err(ServiceError::BadRequest(_))));
        assert_eq!(
            svc.media_url("articles/a.png").await.unwrap(),
            "https://cdn.test/articles/a.png?ttl=600"
        );
    }
}
