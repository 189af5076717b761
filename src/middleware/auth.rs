use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{JwtError, JwtKeys};
use crate::error::ApiError;
use crate::types::Principal;

/// JWT authentication middleware that validates tokens and attaches the principal.
///
/// The principal is also copied onto the response so outer layers can log it.
pub async fn jwt_auth_middleware(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = {
        let token = extract_bearer(request.headers())
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
        verify(&keys, token)?
    };

    request.extensions_mut().insert(principal);
    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    Ok(response)
}

/// `Authorization: Bearer <token>` → `<token>`
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn verify(keys: &JwtKeys, token: &str) -> Result<Principal, ApiError> {
    keys.verify(token).map_err(|err| match err {
        JwtError::InvalidClaims => {
            tracing::warn!("token rejected: empty or unknown claims");
            ApiError::unauthorized("invalid token claims")
        }
        other => {
            tracing::warn!(error = %other, "token rejected");
            ApiError::unauthorized("invalid token")
        }
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("unauthorized"))
    }
}
