pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod storage;
pub mod testing;
pub mod types;
pub mod upload;
pub mod validation;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{jwt_auth_middleware, log_requests, require_role, RoleGate};
use crate::state::AppState;
use crate::types::Role;

/// Full application router: public routes, the admin console behind JWT and
/// role gates, and the global middleware stack.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes())
        .merge(admin_routes(&state))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(log_requests))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{articles, auth, contacts, registrations, system};

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
        .route("/articles", get(articles::list))
        .route("/articles/:id", get(articles::show))
        .route("/registrations", post(registrations::create))
        .route("/contacts", post(contacts::create))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::{articles, contacts, profile, registrations};

    Router::new()
        .route("/admin/profile", get(profile::show))
        .route("/admin/articles", get(articles::list).post(articles::create))
        .route("/admin/articles/media", get(articles::media))
        .route(
            "/admin/articles/:id",
            put(articles::update).delete(articles::delete),
        )
        .route("/admin/registrations", get(registrations::list))
        .route(
            "/admin/registrations/:id",
            get(registrations::show).delete(registrations::delete),
        )
        .route("/admin/contacts", get(contacts::list))
        .route(
            "/admin/contacts/:id",
            get(contacts::show)
                .put(contacts::update)
                .delete(contacts::delete),
        )
        .merge(superadmin_routes())
        // Route layers run bottom-up: the token is verified before any role check
        .route_layer(from_fn_with_state(
            RoleGate::new([Role::Admin, Role::Superadmin]),
            require_role,
        ))
        .route_layer(from_fn_with_state(state.keys.clone(), jwt_auth_middleware))
}

fn superadmin_routes() -> Router<AppState> {
    use handlers::elevated::admins;

    Router::new()
        .route("/admin/admins", get(admins::list).post(admins::create))
        .route(
            "/admin/admins/:id",
            put(admins::update).delete(admins::delete),
        )
        .route_layer(from_fn_with_state(
            RoleGate::new([Role::Superadmin]),
            require_role,
        ))
}

/// A panicking handler still answers with the error envelope.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "handler panicked");

    ApiError::internal_server_error("An error occurred while processing your request").into_response()
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter; `json` switches to structured output for log collectors.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }
}
