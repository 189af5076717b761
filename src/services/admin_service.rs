use std::sync::Arc;

use serde::Deserialize;

use super::{missing, ServiceError};
use crate::auth::hash_password_with_cost;
use crate::database::models::{Admin, NewAdmin};
use crate::database::{AdminRepository, DatabaseError, Page, Pagination};
use crate::types::{Principal, Role};
use crate::validation::{FieldErrors, Validator};

/// Create/update payload for administrator accounts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Required on create; blank on update keeps the current hash
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    pub is_active: Option<bool>,
}

impl AdminInput {
    fn validate(&self, creating: bool) -> Result<Role, FieldErrors> {
        let mut v = Validator::new();
        v.length("username", &self.username, 3, 50);
        v.email("email", &self.email);
        if creating || !self.password.is_empty() {
            v.length("password", &self.password, 6, 50);
        }
        v.one_of("role", &self.role, &["admin", "superadmin"]);
        v.finish()?;

        // one_of above only admits parseable roles
        Ok(self.role.parse().unwrap_or(Role::Admin))
    }
}

#[derive(Clone)]
pub struct AdminService {
    repo: Arc<dyn AdminRepository>,
    bcrypt_cost: u32,
}

impl AdminService {
    pub fn new(repo: Arc<dyn AdminRepository>) -> Self {
        Self::with_cost(repo, bcrypt::DEFAULT_COST)
    }

    pub fn with_cost(repo: Arc<dyn AdminRepository>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    fn require_superadmin(requester: &Principal, action: &str) -> Result<(), ServiceError> {
        if requester.is_superadmin() {
            return Ok(());
        }
        tracing::warn!(
            admin_id = requester.identity,
            role = %requester.role,
            action,
            "forbidden admin management attempt"
        );
        Err(ServiceError::Forbidden("forbidden".into()))
    }

    async fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password_with_cost(&password, cost))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(|e| ServiceError::Password(e.to_string()))
    }

    pub async fn create(&self, requester: &Principal, input: AdminInput) -> Result<Admin, ServiceError> {
        Self::require_superadmin(requester, "create")?;
        let role = input.validate(true)?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            tracing::warn!(email = %input.email, "admin email already exists");
            return Err(ServiceError::Conflict("admin email already exists".into()));
        }

        let password_hash = self.hash(&input.password).await?;
        let admin = self
            .repo
            .create(NewAdmin {
                username: input.username,
                email: input.email,
                password_hash,
                role,
                is_active: input.is_active.unwrap_or(true),
            })
            .await
            .map_err(conflict_on_duplicate)?;

        tracing::info!(admin_id = admin.id, role = %role, "admin created");
        Ok(admin)
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<Admin>, ServiceError> {
        Ok(self.repo.list(page).await?)
    }

    pub async fn profile(&self, id: i64) -> Result<Admin, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("admin"))
    }

    pub async fn update(
        &self,
        requester: &Principal,
        id: i64,
        input: AdminInput,
    ) -> Result<Admin, ServiceError> {
        Self::require_superadmin(requester, "update")?;
        let role = input.validate(false)?;

        let mut admin = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("admin"))?;

        if admin.email != input.email {
            if let Some(other) = self.repo.find_by_email(&input.email).await? {
                if other.id != id {
                    return Err(ServiceError::Conflict("admin email already exists".into()));
                }
            }
        }

        admin.username = input.username;
        admin.email = input.email;
        admin.role = role.as_str().to_string();
        if let Some(is_active) = input.is_active {
            admin.is_active = is_active;
        }
        if !input.password.is_empty() {
            admin.password = self.hash(&input.password).await?;
        }

        let admin = self
            .repo
            .update(&admin)
            .await
            .map_err(|e| match e {
                DatabaseError::UniqueViolation(_) => conflict_on_duplicate(e),
                other => missing("admin")(other),
            })?;
        tracing::info!(admin_id = id, "admin updated");
        Ok(admin)
    }

    pub async fn delete(&self, requester: &Principal, id: i64) -> Result<(), ServiceError> {
        Self::require_superadmin(requester, "delete")?;
        self.repo.delete(id).await.map_err(missing("admin"))?;
        tracing::info!(admin_id = id, "admin deleted");
        Ok(())
    }
}

fn conflict_on_duplicate(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::UniqueViolation(_) => ServiceError::Conflict("admin email already exists".into()),
        other => ServiceError::Database(other),
    }
}
