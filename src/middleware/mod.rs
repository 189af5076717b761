pub mod auth;
pub mod logging;
pub mod response;
pub mod role;

pub use auth::jwt_auth_middleware;
pub use logging::log_requests;
pub use response::{ApiResponse, ApiResult, PageMeta, Paged};
pub use role::{require_role, RoleGate};
