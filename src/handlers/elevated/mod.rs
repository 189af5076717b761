// handlers/elevated/mod.rs - Elevated handlers (superadmin only)
//
// Administrator account management. The superadmin gate runs as a route layer,
// and the admin service re-checks the caller's role before any write.
//
// Security Level: Superadmin
// Middleware: jwt_auth_middleware, require_role(admin | superadmin), require_role(superadmin)
pub mod admins;
