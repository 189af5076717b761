use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::types::{Principal, Role};

/// Allow-list of roles for a route group, fixed when the router is built.
///
/// Gates nest: a group behind `admin | superadmin` can carry an inner
/// `superadmin` gate and a request must pass both.
#[derive(Clone, Debug)]
pub struct RoleGate {
    allowed: Arc<HashSet<Role>>,
}

impl RoleGate {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: Arc::new(roles.into_iter().collect()),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// Runs after `jwt_auth_middleware`; use with `from_fn_with_state(gate, require_role)`.
pub async fn require_role(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match request.extensions().get::<Principal>().copied() {
        Some(principal) => principal,
        None => {
            tracing::error!(path = %request.uri().path(), "role check without authenticated principal");
            return Err(ApiError::unauthorized("unauthorized"));
        }
    };

    if !gate.allows(principal.role) {
        tracing::warn!(
            admin_id = principal.identity,
            role = %principal.role,
            path = %request.uri().path(),
            "role not permitted"
        );
        return Err(ApiError::forbidden("forbidden"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
    use tower::ServiceExt;

    fn request(principal: Option<Principal>, uri: &str) -> Request {
        let mut req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        if let Some(p) = principal {
            req.extensions_mut().insert(p);
        }
        req
    }

    fn nested() -> Router {
        let inner = Router::new()
            .route("/admins", get(|| async { "admins" }))
            .route_layer(from_fn_with_state(RoleGate::new([Role::Superadmin]), require_role));
        Router::new()
            .route("/articles", get(|| async { "articles" }))
            .merge(inner)
            .route_layer(from_fn_with_state(
                RoleGate::new([Role::Admin, Role::Superadmin]),
                require_role,
            ))
    }

    #[tokio::test]
    async fn missing_principal_is_unauthorized() {
        let res = nested().oneshot(request(None, "/articles")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_reaches_group_but_not_nested_subset() {
        let admin = Some(Principal::new(2, Role::Admin));
        let ok = nested().oneshot(request(admin, "/articles")).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let denied = nested().oneshot(request(admin, "/admins")).await.unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn superadmin_passes_both_gates() {
        let root = Some(Principal::new(1, Role::Superadmin));
        let res = nested().oneshot(request(root, "/admins")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn gate_membership() {
        let gate = RoleGate::new([Role::Superadmin]);
        assert!(gate.allows(Role::Superadmin));
        assert!(!gate.allows(Role::Admin));
    }
}
