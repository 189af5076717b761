pub mod credentials;
pub mod jwt;
pub mod password;

pub use credentials::{AuthError, CredentialService, Login};
pub use jwt::{Claims, IssuedToken, JwtError, JwtKeys};
pub use password::{hash_password, hash_password_with_cost, verify_password};
