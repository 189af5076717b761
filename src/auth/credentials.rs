use std::sync::Arc;

use thiserror::Error;

use crate::auth::jwt::{IssuedToken, JwtError, JwtKeys};
use crate::auth::password::verify_password;
use crate::database::models::Admin;
use crate::database::{AdminRepository, DatabaseError};
use crate::types::Principal;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("admin is inactive")]
    AccountInactive,

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("credential check failed: {0}")]
    Internal(String),
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct Login {
    pub token: IssuedToken,
    pub principal: Principal,
    pub admin: Admin,
}

/// Verifies administrator email/password pairs and issues tokens.
#[derive(Clone)]
pub struct CredentialService {
    admins: Arc<dyn AdminRepository>,
    keys: JwtKeys,
}

impl CredentialService {
    pub fn new(admins: Arc<dyn AdminRepository>, keys: JwtKeys) -> Self {
        Self { admins, keys }
    }

    /// Read-only: looks the account up, checks the bcrypt hash and signs a token.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Login, AuthError> {
        let admin = match self.admins.find_by_email(email).await? {
            Some(admin) => admin,
            None => {
                tracing::debug!("login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        // bcrypt is deliberately slow; keep it off the async workers
        let candidate = password.to_string();
        let hash = admin.password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !matches {
            tracing::debug!(admin_id = admin.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !admin.is_active {
            tracing::info!(admin_id = admin.id, "login rejected: account inactive");
            return Err(AuthError::AccountInactive);
        }

        let role = admin
            .role()
            .map_err(|e| AuthError::Internal(format!("admin {} has {}", admin.id, e)))?;
        let principal = Principal::new(admin.id, role);
        let token = self.keys.issue(&principal)?;

        tracing::info!(admin_id = admin.id, role = %role, "admin logged in");
        Ok(Login {
            token,
            principal,
            admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_admin, MemoryAdminRepository};
    use crate::types::Role;
    use std::time::Duration;

    async fn service() -> (CredentialService, JwtKeys) {
        let repo = Arc::new(MemoryAdminRepository::default());
        seed_admin(&*repo, "active@school.test", "correct-horse", Role::Admin, true).await;
        seed_admin(&*repo, "inactive@school.test", "correct-horse", Role::Admin, false).await;
        let keys = JwtKeys::new("test-secret", Duration::from_secs(600));
        (CredentialService::new(repo, keys.clone()), keys)
    }

    #[tokio::test]
    async fn issues_token_for_valid_credentials() {
        let (svc, keys) = service().await;
        let login = svc.authenticate("active@school.test", "correct-horse").await.unwrap();

        assert_eq!(login.principal.role, Role::Admin);
        assert_eq!(keys.verify(&login.token.token).unwrap(), login.principal);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (svc, _) = service().await;
        assert!(matches!(
            svc.authenticate("active@school.test", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.authenticate("nobody@school.test", "correct-horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn inactive_account_is_distinct() {
        let (svc, _) = service().await;
        assert!(matches!(
            svc.authenticate("inactive@school.test", "correct-horse").await,
            Err(AuthError::AccountInactive)
        ));
        // wrong password still reports invalid credentials for inactive accounts
        assert!(matches!(
            svc.authenticate("inactive@school.test", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn email_match_is_exact() {
        let (svc, _) = service().await;
        assert!(matches!(
            svc.authenticate("ACTIVE@school.test", "correct-horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
