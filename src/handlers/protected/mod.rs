// handlers/protected/mod.rs - Protected handlers (admin console)
//
// Every route here sits behind the JWT middleware and a role gate that admits
// `admin` and `superadmin`.
//
// Security Level: Authenticated administrator
// Middleware: jwt_auth_middleware, require_role(admin | superadmin)
pub mod articles;
pub mod contacts;
pub mod profile;
pub mod registrations;
