//! Postgres implementations of the repository traits.
//!
//! Tables: `admins`, `articles`, `registrations`, `contacts`. Every table has a
//! BIGSERIAL `id`; timestamps are TIMESTAMPTZ and article content is JSONB.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, Article, ArticleStatus, Contact, NewAdmin, NewArticle, NewContact, NewRegistration,
    Registration,
};
use crate::database::pagination::{Page, Pagination};
use crate::database::repository::{
    AdminRepository, ArticleRepository, ContactRepository, RegistrationRepository,
};

const ADMIN_COLUMNS: &str =
    "id, username, email, password, role, is_active, created_at, updated_at";
const ARTICLE_COLUMNS: &str =
    "id, title, content, author, status, photo_header, created_at, updated_at";
const REGISTRATION_COLUMNS: &str = "id, student_type, gender, email, full_name, phone, \
     place_of_birth, date_of_birth, address, origin_school, nisn, father_name, \
     father_occupation, phone_father, date_of_birth_father, mother_name, mother_occupation, \
     phone_mother, date_of_birth_mother, created_at";
const CONTACT_COLUMNS: &str = "id, email, subject, message, created_at";

async fn count(pool: &PgPool, sql: &str) -> Result<i64, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?)
}

async fn delete_by_id(pool: &PgPool, table: &str, id: i64) -> Result<(), DatabaseError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("{} {} not found", table, id)));
    }
    Ok(())
}

pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO admins (username, email, password, role, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {}",
            ADMIN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Admin>(&sql)
            .bind(&admin.username)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.role.as_str())
            .bind(admin.is_active)
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list(&self, page: Pagination) -> Result<Page<Admin>, DatabaseError> {
        let total = count(&self.pool, "SELECT COUNT(*) FROM admins").await?;
        let sql = format!(
            "SELECT {} FROM admins ORDER BY id DESC LIMIT $1 OFFSET $2",
            ADMIN_COLUMNS
        );
        let items = sqlx::query_as::<_, Admin>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>, DatabaseError> {
        let sql = format!("SELECT {} FROM admins WHERE id = $1", ADMIN_COLUMNS);
        Ok(sqlx::query_as::<_, Admin>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError> {
        let sql = format!("SELECT {} FROM admins WHERE email = $1", ADMIN_COLUMNS);
        Ok(sqlx::query_as::<_, Admin>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, admin: &Admin) -> Result<Admin, DatabaseError> {
        let sql = format!(
            "UPDATE admins SET username = $2, email = $3, password = $4, role = $5, \
             is_active = $6, updated_at = $7 WHERE id = $1 RETURNING {}",
            ADMIN_COLUMNS
        );
        sqlx::query_as::<_, Admin>(&sql)
            .bind(admin.id)
            .bind(&admin.username)
            .bind(&admin.email)
            .bind(&admin.password)
            .bind(&admin.role)
            .bind(admin.is_active)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("admins {} not found", admin.id)))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        delete_by_id(&self.pool, "admins", id).await
    }
}

pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        status: Option<ArticleStatus>,
        page: Pagination,
    ) -> Result<Page<Article>, DatabaseError> {
        // $1 NULL means "any status"
        let status = status.map(|s| s.as_str());
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM articles WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM articles WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY id DESC LIMIT $2 OFFSET $3",
            ARTICLE_COLUMNS
        );
        let items = sqlx::query_as::<_, Article>(&sql)
            .bind(status)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(Page { items, total })
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn create(&self, article: NewArticle) -> Result<Article, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO articles (title, content, author, status, photo_header, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {}",
            ARTICLE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Article>(&sql)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.author)
            .bind(article.status.as_str())
            .bind(&article.photo_header)
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_all(&self, page: Pagination) -> Result<Page<Article>, DatabaseError> {
        self.list_where(None, page).await
    }

    async fn list_published(&self, page: Pagination) -> Result<Page<Article>, DatabaseError> {
        self.list_where(Some(ArticleStatus::Published), page).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, DatabaseError> {
        let sql = format!("SELECT {} FROM articles WHERE id = $1", ARTICLE_COLUMNS);
        Ok(sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, article: &Article) -> Result<Article, DatabaseError> {
        let sql = format!(
            "UPDATE articles SET title = $2, content = $3, author = $4, status = $5, \
             photo_header = $6, updated_at = $7 WHERE id = $1 RETURNING {}",
            ARTICLE_COLUMNS
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(article.id)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.author)
            .bind(&article.status)
            .bind(&article.photo_header)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("articles {} not found", article.id)))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        delete_by_id(&self.pool, "articles", id).await
    }
}

pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    async fn create(&self, r: NewRegistration) -> Result<Registration, DatabaseError> {
        let sql = format!(
            "INSERT INTO registrations (student_type, gender, email, full_name, phone, \
             place_of_birth, date_of_birth, address, origin_school, nisn, father_name, \
             father_occupation, phone_father, date_of_birth_father, mother_name, \
             mother_occupation, phone_mother, date_of_birth_mother, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING {}",
            REGISTRATION_COLUMNS
        );
        Ok(sqlx::query_as::<_, Registration>(&sql)
            .bind(&r.student_type)
            .bind(&r.gender)
            .bind(&r.email)
            .bind(&r.full_name)
            .bind(&r.phone)
            .bind(&r.place_of_birth)
            .bind(r.date_of_birth)
            .bind(&r.address)
            .bind(&r.origin_school)
            .bind(&r.nisn)
            .bind(&r.father_name)
            .bind(&r.father_occupation)
            .bind(&r.phone_father)
            .bind(r.date_of_birth_father)
            .bind(&r.mother_name)
            .bind(&r.mother_occupation)
            .bind(&r.phone_mother)
            .bind(r.date_of_birth_mother)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list(&self, page: Pagination) -> Result<Page<Registration>, DatabaseError> {
        let total = count(&self.pool, "SELECT COUNT(*) FROM registrations").await?;
        let sql = format!(
            "SELECT {} FROM registrations ORDER BY id DESC LIMIT $1 OFFSET $2",
            REGISTRATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Registration>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DatabaseError> {
        let sql = format!("SELECT {} FROM registrations WHERE id = $1", REGISTRATION_COLUMNS);
        Ok(sqlx::query_as::<_, Registration>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM registrations WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn exists_by_nisn(&self, nisn: &str) -> Result<bool, DatabaseError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM registrations WHERE nisn = $1)",
        )
        .bind(nisn)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        delete_by_id(&self.pool, "registrations", id).await
    }
}

pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, contact: NewContact) -> Result<Contact, DatabaseError> {
        let sql = format!(
            "INSERT INTO contacts (email, subject, message, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            CONTACT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(&contact.email)
            .bind(&contact.subject)
            .bind(&contact.message)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list(&self, page: Pagination) -> Result<Page<Contact>, DatabaseError> {
        let total = count(&self.pool, "SELECT COUNT(*) FROM contacts").await?;
        let sql = format!(
            "SELECT {} FROM contacts ORDER BY id DESC LIMIT $1 OFFSET $2",
            CONTACT_COLUMNS
        );
        let items = sqlx::query_as::<_, Contact>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, DatabaseError> {
        let sql = format!("SELECT {} FROM contacts WHERE id = $1", CONTACT_COLUMNS);
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, id: i64, contact: NewContact) -> Result<Contact, DatabaseError> {
        let sql = format!(
            "UPDATE contacts SET email = $2, subject = $3, message = $4 WHERE id = $1 RETURNING {}",
            CONTACT_COLUMNS
        );
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(&contact.email)
            .bind(&contact.subject)
            .bind(&contact.message)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("contacts {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        delete_by_id(&self.pool, "contacts", id).await
    }
}
