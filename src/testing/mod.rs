//! In-memory backends for unit and integration tests.
//!
//! The repositories mirror the Postgres behaviour the services rely on:
//! newest-first listing, `NotFound` on missing rows and `UniqueViolation` on
//! duplicate unique columns.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;

use crate::auth::hash_password_with_cost;
use crate::config::AppConfig;
use crate::database::models::{
    Admin, Article, Contact, NewAdmin, NewArticle, NewContact, NewRegistration, Registration,
};
use crate::database::{
    AdminRepository, ArticleRepository, ContactRepository, DatabaseError, Page, Pagination,
    RegistrationRepository,
};
use crate::services::{AdminService, RegistrationInput};
use crate::state::{AppState, Repositories};
use crate::storage::{ObjectStore, StorageError};
use crate::types::Role;
use crate::upload::ArticleForm;

pub const TEST_JWT_SECRET: &str = "test-secret-for-darulabror";
/// Minimum bcrypt cost keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Rows plus an id sequence, like a BIGSERIAL table
struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new(), next_id: 1 }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Newest first, then windowed
    fn page(&self, page: Pagination, filter: impl Fn(&T) -> bool) -> Page<T> {
        let matching: Vec<&T> = self.rows.iter().rev().filter(|r| filter(*r)).collect();
        let items = matching
            .iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .map(|r| (*r).clone())
            .collect();
        Page { items, total: matching.len() as i64 }
    }
}

fn not_found(table: &str, id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {} not found", table, id))
}

#[derive(Default)]
pub struct MemoryAdminRepository {
    table: Mutex<Table<Admin>>,
}

impl MemoryAdminRepository {
    pub fn len(&self) -> usize {
        lock(&self.table).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AdminRepository for MemoryAdminRepository {
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DatabaseError> {
        let mut table = lock(&self.table);
        if table.rows.iter().any(|a| a.email == admin.email) {
            return Err(DatabaseError::UniqueViolation("admins_email_key".into()));
        }
        let now = Utc::now();
        let row = Admin {
            id: table.next_id(),
            username: admin.username,
            email: admin.email,
            password: admin.password_hash,
            role: admin.role.as_str().to_string(),
            is_active: admin.is_active,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self, page: Pagination) -> Result<Page<Admin>, DatabaseError> {
        Ok(lock(&self.table).page(page, |_| true))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>, DatabaseError> {
        Ok(lock(&self.table).rows.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError> {
        Ok(lock(&self.table).rows.iter().find(|a| a.email == email).cloned())
    }

    async fn update(&self, admin: &Admin) -> Result<Admin, DatabaseError> {
        let mut table = lock(&self.table);
        if table.rows.iter().any(|a| a.email == admin.email && a.id != admin.id) {
            return Err(DatabaseError::UniqueViolation("admins_email_key".into()));
        }
        let row = table
            .rows
            .iter_mut()
            .find(|a| a.id == admin.id)
            .ok_or_else(|| not_found("admins", admin.id))?;
        *row = Admin { updated_at: Utc::now(), ..admin.clone() };
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut table = lock(&self.table);
        let before = table.rows.len();
        table.rows.retain(|a| a.id != id);
        if table.rows.len() == before {
            return Err(not_found("admins", id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryArticleRepository {
    table: Mutex<Table<Article>>,
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn create(&self, article: NewArticle) -> Result<Article, DatabaseError> {
        let mut table = lock(&self.table);
        let now = Utc::now();
        let row = Article {
            id: table.next_id(),
            title: article.title,
            content: article.content,
            author: article.author,
            status: article.status.as_str().to_string(),
            photo_header: article.photo_header,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn list_all(&self, page: Pagination) -> Result<Page<Article>, DatabaseError> {
        Ok(lock(&self.table).page(page, |_| true))
    }

    async fn list_published(&self, page: Pagination) -> Result<Page<Article>, DatabaseError> {
        Ok(lock(&self.table).page(page, Article::is_published))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, DatabaseError> {
        Ok(lock(&self.table).rows.iter().find(|a| a.id == id).cloned())
    }

    async fn update(&self, article: &Article) -> Result<Article, DatabaseError> {
        let mut table = lock(&self.table);
        let row = table
            .rows
            .iter_mut()
            .find(|a| a.id == article.id)
            .ok_or_else(|| not_found("articles", article.id))?;
        *row = Article { updated_at: Utc::now(), ..article.clone() };
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut table = lock(&self.table);
        let before = table.rows.len();
        table.rows.retain(|a| a.id != id);
        if table.rows.len() == before {
            return Err(not_found("articles", id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRegistrationRepository {
    table: Mutex<Table<Registration>>,
}

#[async_trait]
impl RegistrationRepository for MemoryRegistrationRepository {
    async fn create(&self, registration: NewRegistration) -> Result<Registration, DatabaseError> {
        let mut table = lock(&self.table);
        if table
            .rows
            .iter()
            .any(|r| r.email == registration.email || r.nisn == registration.nisn)
        {
            return Err(DatabaseError::UniqueViolation("registrations_unique".into()));
        }
        let id = table.next_id();
        let row = registration.into_registration(id, Utc::now());
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self, page: Pagination) -> Result<Page<Registration>, DatabaseError> {
        Ok(lock(&self.table).page(page, |_| true))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DatabaseError> {
        Ok(lock(&self.table).rows.iter().find(|r| r.id == id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        Ok(lock(&self.table).rows.iter().any(|r| r.email == email))
    }

    async fn exists_by_nisn(&self, nisn: &str) -> Result<bool, DatabaseError> {
        Ok(lock(&self.table).rows.iter().any(|r| r.nisn == nisn))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut table = lock(&self.table);
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        if table.rows.len() == before {
            return Err(not_found("registrations", id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryContactRepository {
    table: Mutex<Table<Contact>>,
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn create(&self, contact: NewContact) -> Result<Contact, DatabaseError> {
        let mut table = lock(&self.table);
        let row = Contact {
            id: table.next_id(),
            email: contact.email,
            subject: contact.subject,
            message: contact.message,
            created_at: Utc::now(),
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self, page: Pagination) -> Result<Page<Contact>, DatabaseError> {
        Ok(lock(&self.table).page(page, |_| true))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, DatabaseError> {
        Ok(lock(&self.table).rows.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, id: i64, contact: NewContact) -> Result<Contact, DatabaseError> {
        let mut table = lock(&self.table);
        let row = table
            .rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("contacts", id))?;
        row.email = contact.email;
        row.subject = contact.subject;
        row.message = contact.message;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut table = lock(&self.table);
        let before = table.rows.len();
        table.rows.retain(|c| c.id != id);
        if table.rows.len() == before {
            return Err(not_found("contacts", id));
        }
        Ok(())
    }
}

/// Object store keeping uploads in memory.
///
/// Uploaded objects resolve to `{base}/{object}`; signed URLs append
/// `?ttl=<seconds>`.
pub struct MemoryStore {
    base_url: Option<String>,
    objects: Mutex<HashMap<String, Bytes>>,
    /// Uploads allowed before every further upload fails
    fail_after: Option<usize>,
    attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn configured(base_url: &str) -> Self {
        Self {
            base_url: Some(base_url.trim_end_matches('/').to_string()),
            objects: Mutex::new(HashMap::new()),
            fail_after: None,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Behaves like a store with no bucket configured
    pub fn unconfigured() -> Self {
        Self { base_url: None, ..Self::configured("") }
    }

    /// Accepts `successes` uploads, then fails with a transfer error
    pub fn failing_after(base_url: &str, successes: usize) -> Self {
        Self { fail_after: Some(successes), ..Self::configured(base_url) }
    }

    pub fn object_count(&self) -> usize {
        lock(&self.objects).len()
    }

    pub fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.objects).keys().cloned().collect();
        names.sort();
        names
    }

    pub fn object(&self, name: &str) -> Option<Bytes> {
        lock(&self.objects).get(name).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(
        &self,
        bytes: Bytes,
        object_name: &str,
        _content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let base = self.base_url.as_deref().ok_or(StorageError::NotConfigured)?;
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if matches!(self.fail_after, Some(limit) if attempt >= limit) {
            return Err(StorageError::Transfer(format!("simulated failure for {}", object_name)));
        }
        lock(&self.objects).insert(object_name.to_string(), bytes);
        Ok(format!("{}/{}", base, object_name))
    }

    async fn signed_url(&self, object_name: &str, ttl: Duration) -> Result<String, StorageError> {
        let base = self.base_url.as_deref().ok_or(StorageError::NotConfigured)?;
        Ok(format!("{}/{}?ttl={}", base, object_name, ttl.as_secs()))
    }
}

/// Insert an administrator with a fast bcrypt hash of `password`.
pub async fn seed_admin(
    repo: &dyn AdminRepository,
    email: &str,
    password: &str,
    role: Role,
    is_active: bool,
) -> Admin {
    let password_hash = hash_password_with_cost(password, TEST_BCRYPT_COST)
        .unwrap_or_else(|e| panic!("hashing test password: {}", e));
    let username = email.split('@').next().unwrap_or("admin").to_string();
    repo.create(NewAdmin { username, email: email.to_string(), password_hash, role, is_active })
        .await
        .unwrap_or_else(|e| panic!("seeding admin {}: {}", email, e))
}

/// Article form with the given text fields and no files
pub fn article_form(fields: &[(&str, &str)]) -> ArticleForm {
    let mut form = ArticleForm::default();
    for (name, value) in fields {
        form.push_text(name.to_string(), value.to_string());
    }
    form
}

/// A registration that passes validation
pub fn sample_registration(email: &str, nisn: &str) -> RegistrationInput {
    RegistrationInput {
        student_type: "new".into(),
        gender: "female".into(),
        email: email.into(),
        full_name: "Siti Aminah".into(),
        phone: "081234567890".into(),
        place_of_birth: "Bandung".into(),
        date_of_birth: "2012-07-01".into(),
        address: "Jl. Pesantren No. 1".into(),
        origin_school: "SDN 1 Bandung".into(),
        nisn: nisn.into(),
        father_name: "Ahmad Fauzi".into(),
        father_occupation: "Farmer".into(),
        phone_father: "081234567891".into(),
        date_of_birth_father: "1980-01-15".into(),
        mother_name: "Nur Aini".into(),
        mother_occupation: "Teacher".into(),
        phone_mother: "081234567892".into(),
        date_of_birth_mother: "1983-03-20".into(),
    }
}

/// Development config with a fixed JWT secret and no database
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_JWT_SECRET.to_string();
    config.security.jwt_expiry_hours = 1;
    config
}

/// Handles to the in-memory backends behind a test `AppState`.
#[derive(Clone)]
pub struct TestBackend {
    pub admins: Arc<MemoryAdminRepository>,
    pub articles: Arc<MemoryArticleRepository>,
    pub registrations: Arc<MemoryRegistrationRepository>,
    pub contacts: Arc<MemoryContactRepository>,
    pub store: Arc<MemoryStore>,
}

impl TestBackend {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            admins: Arc::default(),
            articles: Arc::default(),
            registrations: Arc::default(),
            contacts: Arc::default(),
            store: Arc::new(store),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            admins: self.admins.clone(),
            articles: self.articles.clone(),
            registrations: self.registrations.clone(),
            contacts: self.contacts.clone(),
        }
    }

    pub fn state(&self, config: AppConfig) -> AppState {
        let state = AppState::new(config, self.repositories(), self.store.clone(), None);
        let admins = AdminService::with_cost(self.admins.clone(), TEST_BCRYPT_COST);
        state.with_admin_service(admins)
    }
}
