use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Principal, Role};

/// Token payload. `admin_id` and `role` default to their empty values so that a
/// token signed without them still decodes and is rejected by the claims check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub admin_id: i64,
    #[serde(default)]
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret is not configured")]
    SecretNotConfigured,

    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("invalid token claims")]
    InvalidClaims,
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// HS256 signing and verification keys built from the server secret.
///
/// Cheap to clone; shared read-only between the login handler and the
/// authentication middleware.
#[derive(Clone)]
pub struct JwtKeys {
    inner: Arc<KeysInner>,
}

struct KeysInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry: Duration,
    configured: bool,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        let configured = !secret.is_empty();
        if !configured {
            tracing::warn!("JWT_SECRET is empty: login and every authenticated request will fail");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            inner: Arc::new(KeysInner {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                validation,
                expiry,
                configured,
            }),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured
    }

    /// Issue a token for the principal, valid for the configured expiry.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, JwtError> {
        let now = Utc::now().timestamp();
        let expires_in = self.inner.expiry.as_secs();
        let claims = Claims {
            admin_id: principal.identity,
            role: principal.role.as_str().to_string(),
            iat: now,
            exp: now + expires_in as i64,
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_in,
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        if !self.inner.configured {
            return Err(JwtError::SecretNotConfigured);
        }
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.inner.encoding)?)
    }

    /// Verify signature and expiry, then require non-empty identity and role.
    pub fn verify(&self, token: &str) -> Result<Principal, JwtError> {
        if !self.inner.configured {
            return Err(JwtError::SecretNotConfigured);
        }

        let data = decode::<Claims>(token, &self.inner.decoding, &self.inner.validation)?;
        let claims = data.claims;

        if claims.admin_id == 0 || claims.role.is_empty() {
            return Err(JwtError::InvalidClaims);
        }
        let role: Role = claims.role.parse().map_err(|_| JwtError::InvalidClaims)?;

        Ok(Principal::new(claims.admin_id, role))
    }
}
