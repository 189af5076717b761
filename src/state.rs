use std::sync::Arc;

use crate::auth::{CredentialService, JwtKeys};
use crate::config::AppConfig;
use crate::database::postgres::{
    PgAdminRepository, PgArticleRepository, PgContactRepository, PgRegistrationRepository,
};
use crate::database::{
    AdminRepository, ArticleRepository, ContactRepository, Database, RegistrationRepository,
};
use crate::services::{AdminService, ArticleService, ContactService, RegistrationService};
use crate::storage::ObjectStore;
use crate::upload::MediaUploader;

/// Storage backends behind the services
#[derive(Clone)]
pub struct Repositories {
    pub admins: Arc<dyn AdminRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub contacts: Arc<dyn ContactRepository>,
}

impl Repositories {
    pub fn postgres(db: &Database) -> Self {
        let pool = db.pool().clone();
        Self {
            admins: Arc::new(PgAdminRepository::new(pool.clone())),
            articles: Arc::new(PgArticleRepository::new(pool.clone())),
            registrations: Arc::new(PgRegistrationRepository::new(pool.clone())),
            contacts: Arc::new(PgContactRepository::new(pool)),
        }
    }
}

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    /// `None` when running on in-memory repositories
    pub db: Option<Database>,
    pub credentials: CredentialService,
    pub admins: AdminService,
    pub articles: ArticleService,
    pub registrations: RegistrationService,
    pub contacts: ContactService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repos: Repositories,
        store: Arc<dyn ObjectStore>,
        db: Option<Database>,
    ) -> Self {
        let keys = JwtKeys::new(&config.security.jwt_secret, config.security.jwt_expiry());
        Self {
            credentials: CredentialService::new(repos.admins.clone(), keys.clone()),
            admins: AdminService::new(repos.admins),
            articles: ArticleService::new(repos.articles, MediaUploader::new(store)),
            registrations: RegistrationService::new(repos.registrations),
            contacts: ContactService::new(repos.contacts),
            config: Arc::new(config),
            keys,
            db,
        }
    }

    pub fn with_admin_service(mut self, admins: AdminService) -> Self {
        self.admins = admins;
        self
    }
}
