use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, Article, Contact, NewAdmin, NewArticle, NewContact, NewRegistration, Registration,
};
use crate::database::pagination::{Page, Pagination};

/// Administrator accounts. Lists are ordered newest first.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DatabaseError>;
    async fn list(&self, page: Pagination) -> Result<Page<Admin>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>, DatabaseError>;
    /// Exact match on the stored email
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError>;
    async fn update(&self, admin: &Admin) -> Result<Admin, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, article: NewArticle) -> Result<Article, DatabaseError>;
    async fn list_all(&self, page: Pagination) -> Result<Page<Article>, DatabaseError>;
    async fn list_published(&self, page: Pagination) -> Result<Page<Article>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, DatabaseError>;
    async fn update(&self, article: &Article) -> Result<Article, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, registration: NewRegistration) -> Result<Registration, DatabaseError>;
    async fn list(&self, page: Pagination) -> Result<Page<Registration>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DatabaseError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError>;
    async fn exists_by_nisn(&self, nisn: &str) -> Result<bool, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: NewContact) -> Result<Contact, DatabaseError>;
    async fn list(&self, page: Pagination) -> Result<Page<Contact>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, DatabaseError>;
    async fn update(&self, id: i64, contact: NewContact) -> Result<Contact, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}
